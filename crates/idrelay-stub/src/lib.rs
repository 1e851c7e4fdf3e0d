// SPDX-License-Identifier: BUSL-1.1
//! # idrelay-stub: Decoding Service Stub
//!
//! A stand-in for the remote identity decoding service. It speaks the same
//! wire protocol the relay expects:
//!
//! - `POST /decode` with form fields `app_id`, `request_id`,
//!   `encrypt_factor` and `sign`.
//! - JSON envelope `{code, msg, data}`; `data` carries either
//!   `{sub_code, sub_msg}` or `{info}`.
//!
//! `info` is the registered record's JSON, DES-CBC encrypted with the
//! caller's `encrypt_factor` as key and IV, then base64 encoded.
//!
//! Records live in memory ([`store::RecordStore`]) and are seeded from a JSON
//! file or programmatically.

pub mod routes;
pub mod store;

pub use routes::{router, StubState};
pub use store::{RecordStore, SeedError};
