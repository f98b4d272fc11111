use echo_service::EchoServiceServer;
use echo_service::FILE_DESCRIPTOR_SET;
use echo_service_impl::EchoServiceImpl;
use rpcall_core::client::{EncodedClient, GenericClient, InitError};
use rpcall_core::config::{Config, EncodingKind};
use rpcall_core::dispatch::{CallError, OutputError, drive};

mod echo_service_impl;

fn echo_config(body: &str) -> Config {
    Config {
        encoding: None,
        endpoint: "http://localhost:50051".to_string(),
        service: "echo.EchoService".to_string(),
        method: "UnaryEcho".to_string(),
        body: body.to_string(),
        metadata: vec![],
        descriptor_set: FILE_DESCRIPTOR_SET.to_vec(),
        timeout: None,
    }
}

fn client(kind: Option<EncodingKind>) -> EncodedClient<EchoServiceServer<EchoServiceImpl>> {
    EncodedClient::from_service(kind, EchoServiceServer::new(EchoServiceImpl))
}

#[tokio::test]
async fn json_unary_call_renders_the_response() {
    let config = echo_config(r#"{ "message": "hello" }"#);

    let handle = drive(client(Some(EncodingKind::Json)), &config)
        .await
        .unwrap();

    assert_eq!(handle.response().unwrap()["message"], "hello");
    assert!(handle.output().unwrap().contains("hello"));
    assert_eq!(handle.meta_backward().get("echo-scope").unwrap(), "test");
}

#[tokio::test]
async fn protobuf_unary_call_renders_the_response() {
    let config = echo_config(r#"{ "message": "hello" }"#);

    let handle = drive(client(Some(EncodingKind::Protobuf)), &config)
        .await
        .unwrap();

    assert_eq!(handle.response().unwrap()["message"], "hello");
    assert!(handle.output().unwrap().contains("hello"));
    assert_eq!(handle.meta_backward().get("echo-scope").unwrap(), "test");
}

#[tokio::test]
async fn business_failure_is_classified_and_returned_as_success() {
    let config = echo_config(r#"{ "message": "biz" }"#);

    let handle = drive(client(None), &config).await.unwrap();

    // The business path never renders a response; the classified form is the output.
    assert!(handle.response().is_none());
    let output = handle.output().unwrap();
    assert!(output.contains("10001"));
    assert!(output.contains("order rejected"));
    assert!(output.contains("oversold"));
    assert_eq!(handle.meta_backward().get("biz-status").unwrap(), "10001");
}

#[tokio::test]
async fn malformed_business_extra_is_an_output_error() {
    let config = echo_config(r#"{ "message": "biz-malformed" }"#);

    let result = drive(client(None), &config).await;

    assert!(matches!(
        result,
        Err(CallError::Output(OutputError::Classify(_)))
    ));
}

#[tokio::test]
async fn plain_error_status_is_a_server_error() {
    let config = echo_config(r#"{ "message": "boom" }"#);

    let result = drive(client(None), &config).await;

    assert!(matches!(result, Err(CallError::Server(_))));
}

#[tokio::test]
async fn unknown_service_is_a_client_error() {
    let mut config = echo_config(r#"{ "message": "hello" }"#);
    config.service = "echo.Ghost".to_string();

    let result = drive(client(None), &config).await;

    assert!(matches!(
        result,
        Err(CallError::Client(InitError::ServiceNotFound(name))) if name == "echo.Ghost"
    ));
}

#[tokio::test]
async fn unknown_method_is_a_client_error() {
    let mut config = echo_config(r#"{ "message": "hello" }"#);
    config.method = "GhostEcho".to_string();

    let result = drive(client(None), &config).await;

    assert!(matches!(
        result,
        Err(CallError::Client(InitError::MethodNotFound(name))) if name == "GhostEcho"
    ));
}

#[tokio::test]
async fn invalid_json_body_is_a_client_error() {
    let config = echo_config("this is not json");

    let result = drive(client(None), &config).await;

    assert!(matches!(
        result,
        Err(CallError::Client(InitError::InvalidBody(_)))
    ));
}

#[tokio::test]
async fn mismatched_body_fails_init_for_the_protobuf_variant() {
    // The protobuf variant marshals eagerly, so a schema mismatch is a setup
    // problem, not a call failure.
    let config = echo_config(r#"{ "no_such_field": true }"#);

    let result = drive(client(Some(EncodingKind::Protobuf)), &config).await;

    assert!(matches!(
        result,
        Err(CallError::Client(InitError::BodyMismatch(_)))
    ));
}

#[tokio::test]
async fn invalid_metadata_key_is_a_client_error() {
    let mut config = echo_config(r#"{ "message": "hello" }"#);
    config.metadata = vec![("bad key with spaces".to_string(), "value".to_string())];

    let result = drive(client(None), &config).await;

    assert!(matches!(
        result,
        Err(CallError::Client(InitError::Metadata(_)))
    ));
}

#[tokio::test]
async fn request_metadata_reaches_the_server() {
    // The echo server ignores request headers, so this only asserts that valid
    // metadata passes validation and the call still completes.
    let mut config = echo_config(r#"{ "message": "hello" }"#);
    config.metadata = vec![("x-request-id".to_string(), "rpcall-test".to_string())];

    let handle = drive(client(None), &config).await.unwrap();

    assert_eq!(handle.response().unwrap()["message"], "hello");
}
