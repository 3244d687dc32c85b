//! Integration tests for the ERP authentication handshake against a fake ERP.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use erpgate_core::UpstreamAuthenticator;
use erpgate_domain::{ErpConfig, ProbePolicy, TokenRequestEncoding, UpstreamAuthError};
use erpgate_infra::ErpAuthClient;
use serde_json::json;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{basic_auth, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ErpConfig {
    ErpConfig::with_base_url(format!("{}/rest/", server.uri()))
}

async fn mount_probe(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/rest/auth/probe"))
        .respond_with(ResponseTemplate::new(status).set_body_string("probe"))
        .mount(server)
        .await;
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

#[tokio::test]
async fn issued_tokens_only_reach_logs_as_prefixes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dados_autenticacao": {
                "token": "SECRETACCESSTOKEN0123456789",
                "refresh_token": "SECRETREFRESH987"
            }
        })))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.probe_enabled = false;
    let client = ErpAuthClient::new(&config).unwrap();

    let (logs, _guard) = capture_logs();
    let credential = client.authenticate("ana", "pw").await.unwrap();
    assert_eq!(credential.access_token, "SECRETACCESSTOKEN0123456789");

    let output = logs.contents();
    assert!(output.contains("SECRETAC..."), "expected a token prefix in:\n{output}");
    assert!(!output.contains("SECRETACCESSTOKEN0123456789"), "access token leaked:\n{output}");
    assert!(!output.contains("SECRETREFRESH987"), "refresh token leaked:\n{output}");
}

#[tokio::test]
async fn unreadable_token_response_does_not_echo_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/auth"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "jwt": "SECRETJWTVALUE42" })),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.probe_enabled = false;
    let client = ErpAuthClient::new(&config).unwrap();

    let (logs, _guard) = capture_logs();
    let err = client.authenticate("ana", "pw").await.unwrap_err();

    assert_eq!(
        err,
        UpstreamAuthError::InvalidResponse("no access token in response (fields: jwt)".into())
    );
    assert!(!logs.contents().contains("SECRETJWTVALUE42"));
}

#[tokio::test]
async fn form_login_with_collector_key_reads_nested_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/auth/probe"))
        .and(basic_auth("ana", "s3cret"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/auth"))
        .and(header("x-cliente-token", "collector-key"))
        .and(body_string_contains("username=ana"))
        .and(body_string_contains("password=czNjcmV0"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "dados_autenticacao": { "token": "erp-access", "refresh_token": "erp-refresh" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.collector_key = Some("collector-key".into());
    let client = ErpAuthClient::new(&config).unwrap();

    let credential = client.authenticate("ana", "s3cret").await.unwrap();
    assert_eq!(credential.access_token, "erp-access");
    assert_eq!(credential.refresh_token.as_deref(), Some("erp-refresh"));
}

#[tokio::test]
async fn lenient_probe_rejection_still_requests_token() {
    let server = MockServer::start().await;
    mount_probe(&server, 401).await;
    Mock::given(method("POST"))
        .and(path("/rest/auth"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "top-level" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ErpAuthClient::new(&config_for(&server)).unwrap();
    let credential = client.authenticate("ana", "pw").await.unwrap();
    assert_eq!(credential.access_token, "top-level");
    assert_eq!(credential.refresh_token, None);
}

#[tokio::test]
async fn strict_probe_rejection_fails_fast() {
    let server = MockServer::start().await;
    mount_probe(&server, 403).await;
    Mock::given(method("POST"))
        .and(path("/rest/auth"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.probe_policy = ProbePolicy::Strict;
    let client = ErpAuthClient::new(&config).unwrap();

    let err = client.authenticate("ana", "pw").await.unwrap_err();
    assert_eq!(err, UpstreamAuthError::Rejected { status: 403, body: "probe".into() });
}

#[tokio::test]
async fn strict_probe_tolerates_other_statuses() {
    let server = MockServer::start().await;
    mount_probe(&server, 404).await;
    Mock::given(method("POST"))
        .and(path("/rest/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "t" })))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.probe_policy = ProbePolicy::Strict;
    let client = ErpAuthClient::new(&config).unwrap();

    assert!(client.authenticate("ana", "pw").await.is_ok());
}

#[tokio::test]
async fn query_encoding_without_base64_sends_plain_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/auth"))
        .and(query_param("username", "ana"))
        .and(query_param("password", "plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "q" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.probe_enabled = false;
    config.token_encoding = TokenRequestEncoding::Query;
    config.encode_password_base64 = false;
    let client = ErpAuthClient::new(&config).unwrap();

    assert_eq!(client.authenticate("ana", "plain").await.unwrap().access_token, "q");
}

#[tokio::test]
async fn token_rejection_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid user"))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.probe_enabled = false;
    let client = ErpAuthClient::new(&config).unwrap();

    let err = client.authenticate("ana", "bad").await.unwrap_err();
    assert_eq!(err, UpstreamAuthError::Rejected { status: 401, body: "invalid user".into() });
}

#[tokio::test]
async fn success_without_token_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.probe_enabled = false;
    let client = ErpAuthClient::new(&config).unwrap();

    let err = client.authenticate("ana", "pw").await.unwrap_err();
    assert!(matches!(err, UpstreamAuthError::InvalidResponse(_)));
}

#[tokio::test]
async fn slow_token_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/auth"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.probe_enabled = false;
    config.auth_timeout_ms = 50;
    let client = ErpAuthClient::new(&config).unwrap();

    let err = client.authenticate("ana", "pw").await.unwrap_err();
    assert_eq!(err, UpstreamAuthError::Timeout(Duration::from_millis(50)));
}

#[tokio::test]
async fn unreachable_erp_is_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = ErpConfig::with_base_url(format!("http://{addr}/rest"));
    config.probe_policy = ProbePolicy::Strict;
    let client = ErpAuthClient::new(&config).unwrap();

    let err = client.authenticate("ana", "pw").await.unwrap_err();
    assert!(matches!(err, UpstreamAuthError::Connection(_)), "got {err:?}");
}
