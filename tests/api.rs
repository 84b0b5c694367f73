//! End-to-end tests: real server, mock upstream.

use eth_explorer::lifecycle::Shutdown;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{client, start_explorer, start_mock_upstream, test_config, Params};

const ADDR: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
const HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";
const DAI: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
const RECIPIENT: &str = "0xf02c1c8e6114b1dbe8937a39260b5b0a374432bb";

fn action(params: &Params) -> &str {
    params.get("action").map(String::as_str).unwrap_or("")
}

fn ok(result: Value) -> (u16, String) {
    (200, json!({"status": "1", "message": "OK", "result": result}).to_string())
}

fn rpc(result: Value) -> (u16, String) {
    (200, json!({"jsonrpc": "2.0", "id": 1, "result": result}).to_string())
}

fn wallet_upstream(params: &Params) -> (u16, String) {
    match action(params) {
        "balance" => ok(json!("1000000000000000000")),
        "getsourcecode" => ok(json!([{"SourceCode": "", "ContractName": ""}])),
        "txlist" => ok(json!([
            {
                "hash": "0xaaa",
                "from": ADDR.to_lowercase(),
                "to": "0x0000000000000000000000000000000000000001",
                "value": "500000000000000000",
                "blockNumber": "19000001",
                "timeStamp": "1700000100"
            },
            {
                "hash": "0xbbb",
                "from": "0x0000000000000000000000000000000000000002",
                "to": ADDR.to_lowercase(),
                "value": "2000000000000000000",
                "blockNumber": "19000000",
                "timeStamp": "1700000000"
            }
        ])),
        "tokenbalance" if params.get("contractaddress").map(String::as_str) == Some(DAI) => {
            ok(json!("2500000000000000000"))
        }
        "tokenbalance" => ok(json!("0")),
        _ => (404, "{}".into()),
    }
}

fn transaction_json(to: Value) -> Value {
    json!({
        "hash": HASH,
        "from": "0xa7d9ddbe1f17865597fbd27ec712455208b6b76d",
        "to": to,
        "value": "0xde0b6b3a7640000",
        "gas": "0x5208",
        "gasPrice": "0x4a817c800",
        "blockNumber": "0x5daf3b",
        "input": "0xa9059cbb0000000000000000000000000000000000000000000000000000000000000001"
    })
}

#[tokio::test]
async fn test_health_makes_no_upstream_calls() {
    let upstream = start_mock_upstream(|_| (500, "{}".into())).await;
    let shutdown = Shutdown::new();
    let base = start_explorer(test_config(&upstream.base_url(), None), &shutdown).await;

    let res = client().get(format!("{}/", base)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status": "ok",
            "message": "Ethereum Explorer API is running",
            "api_key_loaded": false,
        })
    );
    assert!(upstream.calls().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_address_rejected_without_upstream_call() {
    let upstream = start_mock_upstream(wallet_upstream).await;
    let shutdown = Shutdown::new();
    let base = start_explorer(test_config(&upstream.base_url(), None), &shutdown).await;

    let cases = [
        "0x123",
        "d8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
        "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA9604G",
        "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA960450",
    ];
    for case in cases {
        let res = client()
            .get(format!("{}/api/wallet/{}", base, case))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{case}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(
            body["error"],
            "Invalid address format. Must be 42 characters starting with 0x."
        );
    }
    assert!(upstream.calls().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_hash_rejected_without_upstream_call() {
    let upstream = start_mock_upstream(|_| rpc(Value::Null)).await;
    let shutdown = Shutdown::new();
    let base = start_explorer(test_config(&upstream.base_url(), None), &shutdown).await;

    for case in [ADDR, &HASH[..64], "0xnothex"] {
        let res = client()
            .get(format!("{}/api/transaction/{}", base, case))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{case}");
    }
    assert!(upstream.calls().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_wallet_lookup() {
    let upstream = start_mock_upstream(wallet_upstream).await;
    let shutdown = Shutdown::new();
    let base = start_explorer(test_config(&upstream.base_url(), Some("test-key")), &shutdown).await;

    let res = client()
        .get(format!("{}/api/wallet/{}", base, ADDR))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();

    assert_eq!(body["eth_balance"], json!(1.0));
    assert_eq!(body["is_contract"], json!(false));

    let txs = body["transactions"].as_array().unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0]["hash"], "0xaaa");
    assert_eq!(txs[0]["value_eth"], json!(0.5));
    assert_eq!(txs[0]["block"], "19000001");
    assert_eq!(txs[0]["timestamp"], "1700000100");
    assert_eq!(txs[0]["is_outgoing"], json!(true));
    assert_eq!(txs[1]["is_outgoing"], json!(false));

    // Zero balances are dropped; only DAI remains.
    assert_eq!(body["token_balances"], json!({"DAI": 2.5}));

    // Strictly sequential, registry order for tokens.
    assert_eq!(
        upstream.actions(),
        [
            "balance",
            "getsourcecode",
            "txlist",
            "tokenbalance",
            "tokenbalance",
            "tokenbalance",
            "tokenbalance"
        ]
    );

    let calls = upstream.calls();
    for call in &calls {
        assert_eq!(call.get("chainid").map(String::as_str), Some("1"));
        assert_eq!(call.get("apikey").map(String::as_str), Some("test-key"));
        assert_eq!(call.get("address").map(String::as_str), Some(ADDR));
    }
    let txlist = &calls[2];
    assert_eq!(txlist.get("sort").map(String::as_str), Some("desc"));
    assert_eq!(txlist.get("page").map(String::as_str), Some("1"));
    assert_eq!(txlist.get("offset").map(String::as_str), Some("10"));
    assert_eq!(calls[4].get("contractaddress").map(String::as_str), Some(DAI));

    shutdown.trigger();
}

#[tokio::test]
async fn test_wallet_contract_detection() {
    let upstream = start_mock_upstream(|params| match action(params) {
        "getsourcecode" => ok(json!([{"SourceCode": "pragma solidity ^0.8.0;"}])),
        other => {
            let params: Params =
                [("action".to_string(), other.to_string())].into_iter().collect();
            wallet_upstream(&params)
        }
    })
    .await;
    let shutdown = Shutdown::new();
    let base = start_explorer(test_config(&upstream.base_url(), None), &shutdown).await;

    let body: Value = client()
        .get(format!("{}/api/wallet/{}", base, ADDR))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["is_contract"], json!(true));
    assert!(upstream.calls().iter().all(|c| !c.contains_key("apikey")));

    shutdown.trigger();
}

#[tokio::test]
async fn test_wallet_degrades_when_upstream_fails() {
    let upstream = start_mock_upstream(|_| (500, "oops".into())).await;
    let shutdown = Shutdown::new();
    let base = start_explorer(test_config(&upstream.base_url(), None), &shutdown).await;

    let res = client()
        .get(format!("{}/api/wallet/{}", base, ADDR))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "eth_balance": null,
            "is_contract": false,
            "transactions": [],
            "token_balances": {}
        })
    );
    // Failure of one call does not stop the rest.
    assert_eq!(upstream.calls().len(), 7);

    shutdown.trigger();
}

#[tokio::test]
async fn test_wallet_rejected_status_is_null_balance() {
    let upstream = start_mock_upstream(|params| match action(params) {
        "balance" => (
            200,
            json!({"status": "0", "message": "NOTOK", "result": "Error! Invalid address format"})
                .to_string(),
        ),
        "txlist" => (
            200,
            json!({"status": "0", "message": "No transactions found", "result": []}).to_string(),
        ),
        _ => (200, "not json".into()),
    })
    .await;
    let shutdown = Shutdown::new();
    let base = start_explorer(test_config(&upstream.base_url(), None), &shutdown).await;

    let body: Value = client()
        .get(format!("{}/api/wallet/{}", base, ADDR))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["eth_balance"].is_null());
    assert_eq!(body["transactions"], json!([]));
    assert_eq!(body["token_balances"], json!({}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_transaction_lookup() {
    let upstream = start_mock_upstream(|params| match action(params) {
        "eth_getTransactionByHash" => rpc(transaction_json(json!(RECIPIENT))),
        "eth_getTransactionReceipt" => rpc(json!({"status": "0x1", "gasUsed": "0x5208"})),
        _ => (404, "{}".into()),
    })
    .await;
    let shutdown = Shutdown::new();
    let base = start_explorer(test_config(&upstream.base_url(), None), &shutdown).await;

    let res = client()
        .get(format!("{}/api/transaction/{}", base, HASH))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();

    assert_eq!(body["hash"], HASH);
    assert_eq!(body["to"], RECIPIENT);
    assert_eq!(body["value_eth"], json!(1.0));
    assert_eq!(body["value_wei"], json!(1_000_000_000_000_000_000u64));
    assert_eq!(body["block"], json!(6_139_707));
    assert_eq!(body["gas_limit"], json!(21_000));
    assert_eq!(body["gas_price_gwei"], json!(20.0));
    assert_eq!(body["method_id"], "0xa9059cbb");
    assert_eq!(body["status"], "success");
    assert_eq!(body["gas_used"], json!(21_000));
    assert_eq!(body["gas_cost_eth"], json!(0.00042));

    assert_eq!(
        upstream.actions(),
        ["eth_getTransactionByHash", "eth_getTransactionReceipt"]
    );
    assert_eq!(upstream.calls()[0].get("txhash").map(String::as_str), Some(HASH));

    shutdown.trigger();
}

#[tokio::test]
async fn test_transaction_not_found_skips_receipt() {
    let upstream = start_mock_upstream(|_| rpc(Value::Null)).await;
    let shutdown = Shutdown::new();
    let base = start_explorer(test_config(&upstream.base_url(), None), &shutdown).await;

    let res = client()
        .get(format!("{}/api/transaction/{}", base, HASH))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Transaction not found.");
    assert_eq!(upstream.actions(), ["eth_getTransactionByHash"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_transaction_upstream_down_is_not_found() {
    let upstream = start_mock_upstream(|_| (503, "unavailable".into())).await;
    let shutdown = Shutdown::new();
    let base = start_explorer(test_config(&upstream.base_url(), None), &shutdown).await;

    let res = client()
        .get(format!("{}/api/transaction/{}", base, HASH))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(upstream.calls().len(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_transaction_without_receipt_and_contract_creation() {
    let upstream = start_mock_upstream(|params| match action(params) {
        "eth_getTransactionByHash" => {
            let mut tx = transaction_json(Value::Null);
            tx["blockNumber"] = Value::Null;
            tx["input"] = json!("0x");
            rpc(tx)
        }
        _ => rpc(Value::Null),
    })
    .await;
    let shutdown = Shutdown::new();
    let base = start_explorer(test_config(&upstream.base_url(), None), &shutdown).await;

    let body: Value = client()
        .get(format!("{}/api/transaction/{}", base, HASH))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["to"], "Contract Creation");
    assert!(body["block"].is_null());
    assert!(body["method_id"].is_null());
    assert_eq!(body["input_data"], "0x");
    assert!(body["status"].is_null());
    assert!(body["gas_used"].is_null());
    assert!(body["gas_cost_eth"].is_null());
    assert_eq!(upstream.calls().len(), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn test_failed_receipt_status() {
    let upstream = start_mock_upstream(|params| match action(params) {
        "eth_getTransactionByHash" => rpc(transaction_json(json!(RECIPIENT))),
        _ => rpc(json!({"status": "0x0", "gasUsed": "0x7530"})),
    })
    .await;
    let shutdown = Shutdown::new();
    let base = start_explorer(test_config(&upstream.base_url(), None), &shutdown).await;

    let body: Value = client()
        .get(format!("{}/api/transaction/{}", base, HASH))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["gas_used"], json!(30_000));

    shutdown.trigger();
}
