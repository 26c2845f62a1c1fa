use std::time::Duration;

use pretty_assertions::assert_eq;
use site_engine::{
    AuthApi, ClientSettings, FailureKind, ReqwestAuthClient, ResetConfirmBody, ResetRequestBody,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestAuthClient {
    ReqwestAuthClient::new(ClientSettings {
        base_url: format!("{}/", server.uri()),
        ..ClientSettings::default()
    })
    .expect("client")
}

fn confirm_body() -> ResetConfirmBody {
    ResetConfirmBody {
        uid: "u1".to_string(),
        token: "t1".to_string(),
        new_password: "Abc123!".to_string(),
    }
}

#[tokio::test]
async fn request_posts_email_and_ignores_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/password-reset/"))
        .and(body_json(serde_json::json!({ "email": "a@b.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .request_password_reset(&ResetRequestBody {
            email: "a@b.com".to_string(),
        })
        .await;
    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn request_rejection_drops_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/password-reset/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({ "detail": "no user" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .request_password_reset(&ResetRequestBody {
            email: "a@b.com".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::HttpStatus {
            status: 400,
            detail: None
        }
    );
    assert!(err.is_rejection());
}

#[tokio::test]
async fn confirm_posts_snake_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/password-reset/confirm/"))
        .and(body_json(serde_json::json!({
            "uid": "u1",
            "token": "t1",
            "new_password": "Abc123!",
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).confirm_password_reset(&confirm_body()).await;
    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn confirm_rejection_carries_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/password-reset/confirm/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "detail": "Token inválido o expirado" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .confirm_password_reset(&confirm_body())
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::HttpStatus {
            status: 400,
            detail: Some("Token inválido o expirado".to_string())
        }
    );
}

#[tokio::test]
async fn confirm_rejection_without_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/password-reset/confirm/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "new_password": ["too short"] })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .confirm_password_reset(&confirm_body())
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::HttpStatus {
            status: 400,
            detail: None
        }
    );
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(250)))
        .mount(&server)
        .await;

    let client = ReqwestAuthClient::new(ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .expect("client");
    let err = client.confirm_password_reset(&confirm_body()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
    assert!(!err.is_rejection());
}

#[tokio::test]
async fn unreachable_service_is_a_network_failure() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    drop(server);

    let client = ReqwestAuthClient::new(ClientSettings {
        base_url,
        connect_timeout: Duration::from_millis(200),
        request_timeout: Duration::from_millis(500),
    })
    .expect("client");
    let err = client
        .request_password_reset(&ResetRequestBody {
            email: "a@b.com".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
}

#[test]
fn invalid_base_url_is_rejected_up_front() {
    let err = ReqwestAuthClient::new(ClientSettings {
        base_url: "not a url".to_string(),
        ..ClientSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidBaseUrl);
}
