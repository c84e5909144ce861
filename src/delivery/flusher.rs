use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::delivery::{is_delivered, Batch, DeliveryRequest, DeliveryState, Transport};
use crate::error::TransportError;

/// Tick handler of the flush scheduler.
///
/// Each tick starts at most one delivery. The send itself runs on its own
/// task, so a tick never waits for the collector.
#[derive(Clone)]
pub(crate) struct Flusher {
    state: Arc<Mutex<DeliveryState>>,
    transport: Arc<dyn Transport>,
    collector_url: Arc<str>,
    request_timeout: Option<Duration>,
}

impl Flusher {
    pub fn new(
        state: Arc<Mutex<DeliveryState>>,
        transport: Arc<dyn Transport>,
        collector_url: &str,
        request_timeout: Option<Duration>,
    ) -> Self {
        Flusher {
            state,
            transport,
            collector_url: Arc::from(collector_url),
            request_timeout,
        }
    }

    pub fn on_tick(&self) {
        let batch_opt = self.state.lock().start_delivery();
        if let Some(batch) = batch_opt {
            let in_flight = InFlight {
                state: Some(self.state.clone()),
            };
            let flusher = self.clone();
            tokio::spawn(async move { flusher.deliver(batch, in_flight).await });
        }
    }

    async fn deliver(self, batch: Batch, in_flight: InFlight) {
        let num_bytes = batch.body.len();
        let request = DeliveryRequest::post(&*self.collector_url, batch.body);
        let send_fut = self.transport.send(request);
        let outcome = match self.request_timeout {
            Some(request_timeout) => tokio::time::timeout(request_timeout, send_fut)
                .await
                .unwrap_or(Err(TransportError::Timeout(request_timeout))),
            None => send_fut.await,
        };
        let delivered = is_delivered(&outcome);
        in_flight.complete(delivered);
        match outcome {
            Ok(response) if delivered => {
                debug!(
                    first_position=%batch.first_position,
                    num_records=batch.num_records,
                    num_bytes=num_bytes,
                    status=response.status,
                    "delivered batch"
                );
            }
            Ok(response) => {
                warn!(
                    first_position=%batch.first_position,
                    num_records=batch.num_records,
                    status=response.status,
                    "collector rejected batch, will retry"
                );
            }
            Err(transport_error) => {
                warn!(
                    first_position=%batch.first_position,
                    num_records=batch.num_records,
                    error=%transport_error,
                    "failed to send batch, will retry"
                );
            }
        }
    }
}

/// Ends the delivery it was created for exactly once.
///
/// If the send panics, or its task is cancelled, the delivery ends as a
/// failure when the guard is dropped, and the batch is retried on the
/// next tick.
struct InFlight {
    state: Option<Arc<Mutex<DeliveryState>>>,
}

impl InFlight {
    fn complete(mut self, delivered: bool) {
        if let Some(state) = self.state.take() {
            state.lock().complete_delivery(delivered);
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            state.lock().complete_delivery(false);
        }
    }
}
