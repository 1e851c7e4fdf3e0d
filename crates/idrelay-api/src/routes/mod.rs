// SPDX-License-Identifier: BUSL-1.1
//! # API Route Modules
//!
//! - `decode`: the relay endpoint, mounted at the configured route.

pub mod decode;
