//! Nano node JSON RPC client.
//!
//! # Responsibilities
//! - POST `{"action": ...}` requests to a single node endpoint
//! - Turn HTTP failures, `{"error": ...}` replies and unparseable bodies
//!   into [`LedgerError`]s
//! - Report a missing account as [`AccountLookup::NotFound`] instead of an
//!   error
//!
//! Only the connect phase has a timeout; `work_generate` may take minutes.
//! Nothing is retried.

use std::str::FromStr;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::amount::Raw;
use crate::config::NodeConfig;
use crate::keys::Account;
use crate::ledger::block::{SealedBlock, SignedBlock};
use crate::ledger::client::Ledger;
use crate::ledger::types::{
    AccountInfo, AccountLookup, BlockHash, LedgerError, LedgerResult, PendingTransfer, Work,
};

/// Error text the node uses for accounts without an open block.
const ACCOUNT_NOT_FOUND: &str = "Account not found";

/// Ledger client backed by a node's JSON RPC endpoint.
#[derive(Clone)]
pub struct NodeClient {
    client: reqwest::Client,
    url: url::Url,
}

#[derive(Debug, Deserialize)]
struct AccountInfoReply {
    frontier: String,
    balance: String,
    representative: String,
}

#[derive(Debug, Deserialize)]
struct ReceivableReply {
    blocks: Value,
}

#[derive(Debug, Deserialize)]
struct ReceivableEntry {
    amount: String,
    source: String,
}

#[derive(Debug, Deserialize)]
struct WorkReply {
    work: String,
}

#[derive(Debug, Deserialize)]
struct ProcessReply {
    hash: String,
}

impl NodeClient {
    /// Create a client for the configured node.
    pub fn new(config: &NodeConfig) -> LedgerResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            LedgerError::Unreachable(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| LedgerError::Unreachable(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { client, url })
    }

    /// Send one RPC request and decode the reply.
    async fn call<T: DeserializeOwned>(&self, request: Value) -> LedgerResult<T> {
        let action = request["action"].as_str().unwrap_or_default().to_string();
        tracing::debug!(action = %action, node = %self.url, "RPC request");

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| LedgerError::Unreachable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LedgerError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(action = %action, status = status.as_u16(), "RPC request failed");
            return Err(LedgerError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| LedgerError::Malformed(format!("{}: {}", action, e)))?;
        if let Some(error) = value.get("error") {
            let message = error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string());
            return Err(LedgerError::Node(message));
        }

        serde_json::from_value(value).map_err(|e| LedgerError::Malformed(format!("{}: {}", action, e)))
    }
}

impl Ledger for NodeClient {
    async fn account_info(&self, account: &Account) -> LedgerResult<AccountLookup> {
        let request = json!({
            "action": "account_info",
            "account": account.to_string(),
            "representative": "true",
        });
        match self.call::<AccountInfoReply>(request).await {
            Ok(reply) => parse_account_info(*account, reply).map(AccountLookup::Found),
            Err(LedgerError::Node(message)) if message == ACCOUNT_NOT_FOUND => {
                tracing::debug!(account = %account, "Account not opened yet");
                Ok(AccountLookup::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    async fn receivable(&self, account: &Account) -> LedgerResult<Vec<PendingTransfer>> {
        let request = json!({
            "action": "receivable",
            "account": account.to_string(),
            "threshold": "1",
            "source": "true",
        });
        let reply: ReceivableReply = self.call(request).await?;
        let pending = parse_receivable(reply.blocks)?;
        tracing::debug!(account = %account, count = pending.len(), "Fetched receivable blocks");
        Ok(pending)
    }

    async fn work_generate(&self, block: &SignedBlock) -> LedgerResult<Work> {
        let block = block.block();
        let request = json!({
            "action": "work_generate",
            "hash": hex::encode_upper(block.work_root()),
            "difficulty": format!("{:016x}", block.kind().work_threshold()),
        });
        let reply: WorkReply = self.call(request).await?;
        reply.work.parse()
    }

    async fn process(&self, block: &SealedBlock) -> LedgerResult<BlockHash> {
        let request = json!({
            "action": "process",
            "json_block": "true",
            "subtype": block.block().kind().as_str(),
            "block": block.to_json(),
        });
        let reply: ProcessReply = self.call(request).await?;
        reply.hash.parse()
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("url", &self.url.as_str())
            .finish()
    }
}

fn parse_account(text: &str) -> LedgerResult<Account> {
    Account::from_str(text).map_err(|e| LedgerError::Malformed(e.to_string()))
}

fn parse_raw(text: &str) -> LedgerResult<Raw> {
    Raw::from_str(text).map_err(|e| LedgerError::Malformed(e.to_string()))
}

fn parse_account_info(account: Account, reply: AccountInfoReply) -> LedgerResult<AccountInfo> {
    Ok(AccountInfo {
        account,
        balance: parse_raw(&reply.balance)?,
        frontier: Some(reply.frontier.parse()?),
        representative: Some(parse_account(&reply.representative)?),
    })
}

/// The node sends `"blocks": ""` when nothing is receivable, otherwise an
/// object keyed by send block hash.
fn parse_receivable(blocks: Value) -> LedgerResult<Vec<PendingTransfer>> {
    match blocks {
        Value::String(s) if s.is_empty() => Ok(Vec::new()),
        Value::Null => Ok(Vec::new()),
        Value::Object(entries) => entries
            .into_iter()
            .map(|(hash, entry)| {
                let entry: ReceivableEntry = serde_json::from_value(entry)
                    .map_err(|e| LedgerError::Malformed(format!("receivable entry {}: {}", hash, e)))?;
                Ok(PendingTransfer {
                    hash: hash.parse()?,
                    source: parse_account(&entry.source)?,
                    amount: parse_raw(&entry.amount)?,
                })
            })
            .collect(),
        other => Err(LedgerError::Malformed(format!(
            "unexpected receivable blocks: {}",
            other
        ))),
    }
}
