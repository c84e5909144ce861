use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::delivery::{DeliveryRequest, DeliveryResponse, Transport};
use crate::error::TransportError;

#[derive(Clone, Copy, Debug)]
pub(crate) enum Reply {
    Status(u16),
    Error,
}

#[derive(Default)]
struct Script {
    requests: Vec<DeliveryRequest>,
    replies: VecDeque<Reply>,
}

/// Records every request, and answers with the queued replies,
/// then with `200` once they are exhausted.
///
/// When built with [`ScriptedTransport::gated`], each reply also waits for
/// a call to [`ScriptedTransport::release`].
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedTransport {
    pub fn replying(replies: impl IntoIterator<Item = Reply>) -> Self {
        let transport = ScriptedTransport::default();
        transport.script.lock().replies.extend(replies);
        transport
    }

    pub fn gated() -> Self {
        ScriptedTransport {
            script: Arc::default(),
            gate: Some(Arc::new(Semaphore::new(0))),
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn bodies(&self) -> Vec<String> {
        self.script
            .lock()
            .requests
            .iter()
            .map(|request| request.body.clone())
            .collect()
    }

    pub fn num_requests(&self) -> usize {
        self.script.lock().requests.len()
    }

    pub fn last_url(&self) -> Option<String> {
        self.script.lock().requests.last().map(|request| request.url.clone())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: DeliveryRequest) -> Result<DeliveryResponse, TransportError> {
        self.script.lock().requests.push(request);
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|_| TransportError::Unavailable("gate closed".to_string()))?
                .forget();
        }
        let reply = self
            .script
            .lock()
            .replies
            .pop_front()
            .unwrap_or(Reply::Status(200));
        match reply {
            Reply::Status(status) => Ok(DeliveryResponse { status }),
            Reply::Error => Err(TransportError::Unavailable("some error".to_string())),
        }
    }
}

/// Lets spawned tasks run until they are all blocked again.
pub(crate) async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// Moves the paused clock forward by one flush period, and lets the
/// resulting delivery (if any) run.
pub(crate) async fn tick(period: Duration) {
    tokio::time::advance(period).await;
    settle().await;
}
