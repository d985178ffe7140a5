//! NodeClient tests against a mock node speaking HTTP on localhost.

mod common;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use atto::config::NodeConfig;
use atto::keys::{derive_account, Account, Seed};
use atto::ledger::{
    AccountInfo, AccountLookup, BlockHash, Ledger, LedgerError, NodeClient, PendingTransfer,
    SignedBlock, Work,
};
use atto::pipeline::{settle_balance, Settings};
use atto::{AttoConfig, Raw};

use common::start_mock_node;

const SOURCE: &str = "nano_1ugyfqhfw337bgfwgqa617ynyj18ojx7ywuncn83xu8ad77zp9mip188iakf";
const REPRESENTATIVE: &str = "nano_3rrf6cus8pye6o1kzi5n6wwjof8bjb7ff4xcgesi3njxid6x64pms6onw1f9";

type Requests = Arc<Mutex<Vec<Value>>>;

fn client(addr: SocketAddr) -> NodeClient {
    NodeClient::new(&NodeConfig {
        rpc_url: format!("http://{}/", addr),
        connect_timeout_secs: 2,
    })
    .unwrap()
}

fn account() -> Account {
    derive_account(&Seed::from_bytes([0u8; 32]), 0).1
}

/// Mock node replying with a fixed status and body, recording requests.
async fn fixed_node(status: u16, body: Value) -> (SocketAddr, Requests) {
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();
    let body = body.to_string();
    let addr = start_mock_node(move |request| {
        recorded.lock().unwrap().push(request);
        let body = body.clone();
        async move { (status, body) }
    })
    .await;
    (addr, requests)
}

fn signed_open_block() -> SignedBlock {
    let (key, account) = derive_account(&Seed::from_bytes([0u8; 32]), 0);
    let transfer = PendingTransfer {
        hash: BlockHash([0x22; 32]),
        source: SOURCE.parse().unwrap(),
        amount: Raw(1_000),
    };
    AccountInfo::unopened(account)
        .open_block(&transfer, &REPRESENTATIVE.parse().unwrap())
        .unwrap()
        .sign(&key)
        .unwrap()
}

#[tokio::test]
async fn test_account_info_found() {
    let (addr, requests) = fixed_node(
        200,
        json!({
            "frontier": "AB".repeat(32),
            "open_block": "CD".repeat(32),
            "balance": "1125000000000000000000000000",
            "block_count": "2",
            "representative": REPRESENTATIVE,
        }),
    )
    .await;

    let lookup = client(addr).account_info(&account()).await.unwrap();
    let AccountLookup::Found(info) = lookup else {
        panic!("expected an opened account, got {:?}", lookup);
    };
    assert_eq!(info.account, account());
    assert_eq!(info.balance, Raw(1_125 * 10u128.pow(24)));
    assert_eq!(info.frontier, Some(BlockHash([0xAB; 32])));
    assert_eq!(info.representative.unwrap().to_string(), REPRESENTATIVE);

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0]["action"], "account_info");
    assert_eq!(requests[0]["account"], account().to_string());
}

#[tokio::test]
async fn test_account_info_not_found() {
    let (addr, _) = fixed_node(200, json!({ "error": "Account not found" })).await;

    let lookup = client(addr).account_info(&account()).await.unwrap();
    assert_eq!(lookup, AccountLookup::NotFound);
}

#[tokio::test]
async fn test_other_node_errors_are_failures() {
    let (addr, _) = fixed_node(200, json!({ "error": "Bad account number" })).await;

    let err = client(addr).account_info(&account()).await.unwrap_err();
    assert!(matches!(err, LedgerError::Node(ref msg) if msg == "Bad account number"));
}

#[tokio::test]
async fn test_receivable_empty_string() {
    let (addr, requests) = fixed_node(200, json!({ "blocks": "" })).await;

    let pending = client(addr).receivable(&account()).await.unwrap();
    assert!(pending.is_empty());

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0]["action"], "receivable");
    assert_eq!(requests[0]["source"], "true");
}

#[tokio::test]
async fn test_receivable_keeps_node_order() {
    let body = format!(
        r#"{{"blocks":{{"{}":{{"amount":"7","source":"{}"}},"{}":{{"amount":"3","source":"{}"}}}}}}"#,
        "EE".repeat(32),
        SOURCE,
        "11".repeat(32),
        SOURCE
    );
    let addr = start_mock_node(move |_| {
        let body = body.clone();
        async move { (200, body) }
    })
    .await;

    let pending = client(addr).receivable(&account()).await.unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].hash, BlockHash([0xEE; 32]));
    assert_eq!(pending[0].amount, Raw(7));
    assert_eq!(pending[1].hash, BlockHash([0x11; 32]));
    assert_eq!(pending[1].source.to_string(), SOURCE);
}

#[tokio::test]
async fn test_work_generate_uses_root_and_threshold() {
    let (addr, requests) = fixed_node(200, json!({ "work": "2bf29ef00786a6bc" })).await;
    let block = signed_open_block();

    let work = client(addr).work_generate(&block).await.unwrap();
    assert_eq!(work, Work(0x2bf29ef00786a6bc));

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0]["action"], "work_generate");
    // Open blocks are rooted at the account's public key.
    assert_eq!(requests[0]["hash"], hex::encode_upper(account().public_key()));
    assert_eq!(requests[0]["difficulty"], "fffffe0000000000");
}

#[tokio::test]
async fn test_process_submits_json_block() {
    let block = signed_open_block();
    let hash = block.block().hash();
    let (addr, requests) = fixed_node(200, json!({ "hash": hash.to_string() })).await;

    let sealed = block.with_work(Work(0x2bf29ef00786a6bc));
    let accepted = client(addr).process(&sealed).await.unwrap();
    assert_eq!(accepted, hash);

    let requests = requests.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request["action"], "process");
    assert_eq!(request["json_block"], "true");
    assert_eq!(request["subtype"], "open");
    assert_eq!(request["block"]["type"], "state");
    assert_eq!(request["block"]["previous"], "0".repeat(64));
    assert_eq!(request["block"]["balance"], "1000");
    assert_eq!(request["block"]["work"], "2bf29ef00786a6bc");
    assert_eq!(request["block"]["representative"], REPRESENTATIVE);
}

#[tokio::test]
async fn test_http_error_status() {
    let (addr, _) = fixed_node(503, json!({})).await;

    let err = client(addr).receivable(&account()).await.unwrap_err();
    assert!(matches!(err, LedgerError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_malformed_reply() {
    let addr = start_mock_node(|_| async { (200, "not json".to_string()) }).await;
    let err = client(addr).receivable(&account()).await.unwrap_err();
    assert!(matches!(err, LedgerError::Malformed(_)));

    let (addr, _) = fixed_node(200, json!({ "work": "xyz" })).await;
    let err = client(addr)
        .work_generate(&signed_open_block())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Malformed(_)));
}

#[tokio::test]
async fn test_unreachable_node() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr).account_info(&account()).await.unwrap_err();
    assert!(matches!(err, LedgerError::Unreachable(_)));
}

#[tokio::test]
async fn test_balance_against_mock_node() {
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();
    let pending = format!(
        r#"{{"blocks":{{"{}":{{"amount":"1025000000000000000000000000","source":"{}"}},"{}":{{"amount":"100000000000000000000000000","source":"{}"}}}}}}"#,
        "AA".repeat(32),
        SOURCE,
        "BB".repeat(32),
        SOURCE
    );

    let addr = start_mock_node(move |request: Value| {
        recorded.lock().unwrap().push(request.clone());
        let reply = match request["action"].as_str() {
            Some("account_info") => json!({ "error": "Account not found" }).to_string(),
            Some("receivable") => pending.clone(),
            Some("work_generate") => json!({ "work": "0000000000000001" }).to_string(),
            Some("process") => json!({ "hash": "00".repeat(32) }).to_string(),
            _ => json!({ "error": "Unknown command" }).to_string(),
        };
        async move { (200, reply) }
    })
    .await;

    let settings = Settings::new(&AttoConfig::default(), 0, false).unwrap();
    let mut progress = Vec::new();
    let balance = settle_balance(
        &client(addr),
        &settings,
        &Seed::from_bytes([0u8; 32]),
        &mut progress,
    )
    .await
    .unwrap();
    assert_eq!(balance.to_display(settings.amount_decimals), "1.125");

    let narration = String::from_utf8(progress).unwrap();
    assert_eq!(narration.matches("Creating receive block for").count(), 2);
    assert_eq!(narration.matches("opening account... ").count(), 1);

    let actions: Vec<String> = requests
        .lock()
        .unwrap()
        .iter()
        .map(|r| r["action"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        actions,
        vec![
            "account_info",
            "receivable",
            "work_generate",
            "process",
            "work_generate",
            "process"
        ]
    );

    let submitted: Vec<Value> = requests
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r["action"] == "process")
        .cloned()
        .collect();
    assert_eq!(submitted[0]["subtype"], "open");
    assert_eq!(submitted[1]["subtype"], "receive");
    assert_eq!(submitted[1]["block"]["balance"], "1125000000000000000000000000");
    assert_eq!(submitted[1]["block"]["link"], "BB".repeat(32));
}
