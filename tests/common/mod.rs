//! Shared utilities for integration testing.

use std::cell::RefCell;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use atto::keys::Account;
use atto::ledger::{
    AccountInfo, AccountLookup, BlockHash, BlockKind, Ledger, LedgerError, LedgerResult,
    PendingTransfer, SealedBlock, SignedBlock, Work,
};
use atto::Raw;

/// One recorded ledger call.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AccountInfo,
    Receivable,
    WorkGenerate(BlockKind),
    Process(BlockKind),
}

/// In-memory ledger that records every call and accepts every block.
#[allow(dead_code)]
pub struct MockLedger {
    pub lookup: AccountLookup,
    pub pending: Vec<PendingTransfer>,
    /// Fail the n-th work request (1-based).
    pub fail_work_on: Option<usize>,
    /// Fail the n-th submission (1-based).
    pub fail_process_on: Option<usize>,
    calls: RefCell<Vec<Call>>,
    submitted: RefCell<Vec<SealedBlock>>,
}

#[allow(dead_code)]
impl MockLedger {
    pub fn new(lookup: AccountLookup, pending: Vec<PendingTransfer>) -> Self {
        Self {
            lookup,
            pending,
            fail_work_on: None,
            fail_process_on: None,
            calls: RefCell::new(Vec::new()),
            submitted: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn submitted(&self) -> Vec<SealedBlock> {
        self.submitted.borrow().clone()
    }

    fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| matches(c)).count()
    }
}

impl Ledger for MockLedger {
    async fn account_info(&self, _account: &Account) -> LedgerResult<AccountLookup> {
        self.calls.borrow_mut().push(Call::AccountInfo);
        Ok(self.lookup.clone())
    }

    async fn receivable(&self, _account: &Account) -> LedgerResult<Vec<PendingTransfer>> {
        self.calls.borrow_mut().push(Call::Receivable);
        Ok(self.pending.clone())
    }

    async fn work_generate(&self, block: &SignedBlock) -> LedgerResult<Work> {
        self.calls
            .borrow_mut()
            .push(Call::WorkGenerate(block.block().kind()));
        if Some(self.count(|c| matches!(c, Call::WorkGenerate(_)))) == self.fail_work_on {
            return Err(LedgerError::Unreachable("work server down".to_string()));
        }
        Ok(Work(0x1234))
    }

    async fn process(&self, block: &SealedBlock) -> LedgerResult<BlockHash> {
        self.calls
            .borrow_mut()
            .push(Call::Process(block.block().kind()));
        if Some(self.count(|c| matches!(c, Call::Process(_)))) == self.fail_process_on {
            return Err(LedgerError::Node("Fork".to_string()));
        }
        self.submitted.borrow_mut().push(block.clone());
        Ok(block.block().hash())
    }
}

/// Pending transfer with a distinct hash per `tag`.
#[allow(dead_code)]
pub fn transfer(tag: u8, amount: u128, source: Account) -> PendingTransfer {
    PendingTransfer {
        hash: BlockHash([tag; 32]),
        source,
        amount: Raw(amount),
    }
}

/// Opened account state with the given frontier.
#[allow(dead_code)]
pub fn opened(account: Account, balance: u128, frontier: BlockHash) -> AccountInfo {
    AccountInfo {
        account,
        balance: Raw(balance),
        frontier: Some(frontier),
        representative: Some(Account::from_public_key([0x44; 32])),
    }
}

/// Start a mock Nano node. `handler` gets each decoded JSON request and
/// returns a status code and a raw body.
#[allow(dead_code)]
pub async fn start_mock_node<F, Fut>(handler: F) -> SocketAddr
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let _ = serve(socket, handler.as_ref()).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn serve<F, Fut>(mut socket: TcpStream, handler: &F) -> std::io::Result<()>
where
    F: Fn(Value) -> Fut,
    Fut: Future<Output = (u16, String)>,
{
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buffer[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buffer.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    let request: Value = serde_json::from_slice(&buffer[header_end..]).unwrap_or(Value::Null);
    let (status, body) = handler(request).await;
    let status_text = match status {
        200 => "200 OK",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}
