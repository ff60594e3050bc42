//! Stub providers shared by router and handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ai::{AiError, AiRequest, AiResponse, LlmProvider, ProviderKind};

/// Shared, ordered log of (provider, request) pairs across stubs.
pub type CallLog = Arc<Mutex<Vec<(ProviderKind, AiRequest)>>>;

#[derive(Clone)]
enum Reply {
    Text(String),
    Status(u16),
    Empty,
    Unconfigured,
}

/// Deterministic provider that records every call and never touches the network.
#[derive(Clone)]
pub struct StubProvider {
    kind: ProviderKind,
    reply: Reply,
    log: CallLog,
}

impl StubProvider {
    pub fn replying(kind: ProviderKind, text: &str, log: &CallLog) -> Self {
        Self::with(kind, Reply::Text(text.to_string()), log)
    }

    pub fn failing(kind: ProviderKind, status: u16, log: &CallLog) -> Self {
        Self::with(kind, Reply::Status(status), log)
    }

    pub fn empty(kind: ProviderKind, log: &CallLog) -> Self {
        Self::with(kind, Reply::Empty, log)
    }

    pub fn unconfigured(kind: ProviderKind, log: &CallLog) -> Self {
        Self::with(kind, Reply::Unconfigured, log)
    }

    fn with(kind: ProviderKind, reply: Reply, log: &CallLog) -> Self {
        Self {
            kind,
            reply,
            log: Arc::clone(log),
        }
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn call(&self, request: &AiRequest) -> Result<AiResponse, AiError> {
        if let Reply::Unconfigured = self.reply {
            return Err(AiError::Configuration {
                vendor: self.kind,
                message: "no API key".to_string(),
            });
        }

        self.log.lock().unwrap().push((self.kind, request.clone()));

        match &self.reply {
            Reply::Text(text) => Ok(AiResponse {
                text: text.clone(),
                provider: self.kind,
                model: format!("{}-stub", self.kind.as_str()),
            }),
            Reply::Status(status) => Err(AiError::ProviderCall {
                vendor: self.kind,
                status: Some(*status),
                message: format!("stub failure {status}"),
            }),
            Reply::Empty => Err(AiError::EmptyResponse { vendor: self.kind }),
            Reply::Unconfigured => unreachable!(),
        }
    }
}

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Providers called so far, in order.
pub fn called(log: &CallLog) -> Vec<ProviderKind> {
    log.lock().unwrap().iter().map(|(kind, _)| *kind).collect()
}
