//! Integration tests for the JSON-RPC chain backend, against a local mock
//! node: submit → receipt polling, error mapping, and malformed payloads.

use std::time::Duration;

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tickr_chain::{ChainClient, ChainError, ContractCall};
use tickr_config::ChainSettings;
use tickr_types::Address;

fn rpc_client(server: &MockServer, poll_attempts: u32) -> ChainClient {
    let settings = ChainSettings {
        rpc_url: Some(server.uri().parse().unwrap()),
        contract_address: Some(Address::new("0xc0ffee").unwrap()),
        receipt_poll_interval: Duration::from_millis(1),
        receipt_poll_attempts: poll_attempts,
        request_timeout: Duration::from_secs(5),
    };
    ChainClient::from_settings(&settings)
}

fn rpc_result(value: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": value,
    }))
}

#[tokio::test]
async fn submit_confirms_a_successful_receipt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(
            serde_json::json!({ "method": "tikr_sendTransaction" }),
        ))
        .respond_with(rpc_result(serde_json::json!("0xABCdef0123")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(
            serde_json::json!({ "method": "tikr_getTransactionReceipt" }),
        ))
        .respond_with(rpc_result(
            serde_json::json!({ "hash": "0xabcdef0123", "status": 1 }),
        ))
        .mount(&server)
        .await;

    let client = rpc_client(&server, 3);
    let call = ContractCall::new("mint", vec![serde_json::json!("0xbuyer")]);
    let receipt = client.submit(call).await.unwrap();

    assert!(receipt.status.succeeded());
    assert_eq!(receipt.hash.as_str(), "0xabcdef0123");
}

#[tokio::test]
async fn submit_polls_until_the_receipt_lands() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(
            serde_json::json!({ "method": "tikr_sendTransaction" }),
        ))
        .respond_with(rpc_result(serde_json::json!("0xfeed01")))
        .mount(&server)
        .await;

    // First receipt poll: still pending.
    Mock::given(method("POST"))
        .and(body_partial_json(
            serde_json::json!({ "method": "tikr_getTransactionReceipt" }),
        ))
        .respond_with(rpc_result(serde_json::Value::Null))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(
            serde_json::json!({ "method": "tikr_getTransactionReceipt" }),
        ))
        .respond_with(rpc_result(
            serde_json::json!({ "hash": "0xfeed01", "status": 1 }),
        ))
        .mount(&server)
        .await;

    let client = rpc_client(&server, 5);
    let call = ContractCall::new("burn", vec![serde_json::json!(1000)]);
    let receipt = client.submit(call).await.unwrap();
    assert!(receipt.status.succeeded());
}

#[tokio::test]
async fn reverted_transactions_surface_as_failed_receipts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(
            serde_json::json!({ "method": "tikr_sendTransaction" }),
        ))
        .respond_with(rpc_result(serde_json::json!("0xdead02")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(
            serde_json::json!({ "method": "tikr_getTransactionReceipt" }),
        ))
        .respond_with(rpc_result(
            serde_json::json!({ "hash": "0xdead02", "status": 0 }),
        ))
        .mount(&server)
        .await;

    let client = rpc_client(&server, 3);
    let call = ContractCall::new("safeTransferFrom", vec![]);
    let receipt = client.submit(call).await.unwrap();
    assert!(!receipt.status.succeeded());
}

#[tokio::test]
async fn receipt_poll_exhaustion_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(
            serde_json::json!({ "method": "tikr_sendTransaction" }),
        ))
        .respond_with(rpc_result(serde_json::json!("0xaaaa03")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(
            serde_json::json!({ "method": "tikr_getTransactionReceipt" }),
        ))
        .respond_with(rpc_result(serde_json::Value::Null))
        .mount(&server)
        .await;

    let client = rpc_client(&server, 2);
    let call = ContractCall::new("mint", vec![]);
    let error = client.submit(call).await.unwrap_err();
    assert!(matches!(
        error,
        ChainError::ReceiptTimeout { attempts: 2, .. }
    ));
}

#[tokio::test]
async fn node_errors_map_to_chain_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "insufficient funds" },
        })))
        .mount(&server)
        .await;

    let client = rpc_client(&server, 3);
    let call = ContractCall::new("mint", vec![]);
    let error = client.submit(call).await.unwrap_err();

    match error {
        ChainError::Node { code, message } => {
            assert_eq!(code, -32000);
            assert_eq!(message, "insufficient funds");
        }
        other => panic!("expected node error, got {other:?}"),
    }
}

#[tokio::test]
async fn unexpected_result_shapes_are_malformed_responses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({ "method": "tikr_call" })))
        .respond_with(rpc_result(serde_json::json!("not-a-number")))
        .mount(&server)
        .await;

    let client = rpc_client(&server, 3);
    let call = ContractCall::new("balanceOf", vec![serde_json::json!("0xowner")]);
    let error = client.query(call).await.unwrap_err();
    assert!(matches!(error, ChainError::MalformedResponse(_)));
}

#[tokio::test]
async fn queries_return_numeric_values() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "method": "tikr_call",
            "params": [{ "to": "0xc0ffee", "method": "balanceOf" }],
        })))
        .respond_with(rpc_result(serde_json::json!(3)))
        .mount(&server)
        .await;

    let client = rpc_client(&server, 3);
    let call = ContractCall::new("balanceOf", vec![serde_json::json!("0xowner")]);
    assert_eq!(client.query(call).await.unwrap(), 3);
}
