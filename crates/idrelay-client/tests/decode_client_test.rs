//! Contract tests for DecodeClient against a wiremock decoding service.
//!
//! | Case | Reply | Expected |
//! |------|-------|----------|
//! | form body | any | signed fields form-encoded, `sign` included once |
//! | `code != 10000` | `{"code":"20000"}` | `Ok`, status `Rejected` |
//! | declined | `sub_code` | `Ok`, status `Declined` |
//! | accepted | `info` | `Ok`, status `Accepted` |
//! | non-JSON | `<html>` | `Deserialization` |
//! | 5xx | 502 | `ApiError` |
//! | slow | delay > timeout | `Timeout` |
//! | closed port | none | `Http` |

use std::collections::BTreeMap;
use std::time::Duration;

use idrelay_client::{DecodeApiError, DecodeClient, DecodeClientConfig, EnvelopeStatus};
use idrelay_crypto::SignedRequest;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, timeout_secs: u64) -> DecodeClient {
    let config = DecodeClientConfig::from_endpoint(&format!("{}/openapi/decode", server.uri()))
        .unwrap()
        .with_timeout_secs(timeout_secs);
    DecodeClient::new(config).unwrap()
}

fn signed(request_id: &str) -> SignedRequest {
    let params: BTreeMap<String, String> = [
        ("app_id", "app-001"),
        ("request_id", request_id),
        ("encrypt_factor", "aB3dE6gH"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    SignedRequest::sign(params, "s3cret").unwrap()
}

#[tokio::test]
async fn posts_signed_form_fields() {
    let server = MockServer::start().await;
    let req = signed("req-1");

    Mock::given(method("POST"))
        .and(path("/openapi/decode"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("app_id=app-001"))
        .and(body_string_contains("request_id=req-1"))
        .and(body_string_contains("encrypt_factor=aB3dE6gH"))
        .and(body_string_contains(format!("sign={}", req.sign_value())))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": "20000", "msg": "invalid app"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 5);
    let env = client.invoke(&req).await.unwrap();
    assert_eq!(env.code, "20000");

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8(received[0].body.clone()).unwrap();
    assert_eq!(body.matches("sign=").count(), 1);
    assert!(!body.contains("s3cret"), "secret must never go on the wire");
}

#[tokio::test]
async fn rejected_envelope_is_ok() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": "20000", "msg": "invalid app"})),
        )
        .mount(&server)
        .await;

    let env = client_for(&server, 5).invoke(&signed("r")).await.unwrap();
    assert_eq!(
        env.status().unwrap(),
        EnvelopeStatus::Rejected {
            code: "20000".into(),
            msg: Some("invalid app".into())
        }
    );
}

#[tokio::test]
async fn declined_envelope_is_ok() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "10000",
            "data": {"sub_code": "X1", "sub_msg": "declined"}
        })))
        .mount(&server)
        .await;

    let env = client_for(&server, 5).invoke(&signed("r")).await.unwrap();
    assert!(matches!(
        env.status().unwrap(),
        EnvelopeStatus::Declined { ref sub_code, .. } if sub_code == "X1"
    ));
}

#[tokio::test]
async fn accepted_envelope_carries_info() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "10000",
            "msg": "success",
            "data": {"info": "CyqS6B+0nOGkMmaqyup7gQ=="}
        })))
        .mount(&server)
        .await;

    let env = client_for(&server, 5).invoke(&signed("r")).await.unwrap();
    assert_eq!(
        env.status().unwrap(),
        EnvelopeStatus::Accepted {
            info: "CyqS6B+0nOGkMmaqyup7gQ==".into()
        }
    );
}

#[tokio::test]
async fn non_json_body_is_deserialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server, 5).invoke(&signed("r")).await.unwrap_err();
    match err {
        DecodeApiError::Deserialization { body, .. } => assert!(body.contains("oops")),
        other => panic!("expected Deserialization, got {other:?}"),
    }
}

#[tokio::test]
async fn json_without_code_is_deserialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"msg": "no code"})))
        .mount(&server)
        .await;

    let err = client_for(&server, 5).invoke(&signed("r")).await.unwrap_err();
    assert!(matches!(err, DecodeApiError::Deserialization { .. }));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn server_error_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = client_for(&server, 5).invoke(&signed("r")).await.unwrap_err();
    match err {
        DecodeApiError::ApiError { status, body, .. } => {
            assert_eq!(status, 502);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_service_hits_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_json(serde_json::json!({"code": "10000"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, 1).invoke(&signed("r")).await.unwrap_err();
    assert!(
        matches!(err, DecodeApiError::Timeout { timeout_secs: 1, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn closed_port_is_http_error() {
    let config = DecodeClientConfig::from_endpoint("http://127.0.0.1:1/decode")
        .unwrap()
        .with_timeout_secs(2);
    let client = DecodeClient::new(config).unwrap();
    let err = client.invoke(&signed("r")).await.unwrap_err();
    assert!(err.is_transport(), "got {err:?}");
}
