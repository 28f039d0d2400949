//! Single-flight dispatch of service requests.
//!
//! One request may be outstanding per session. It runs on a worker thread and
//! reports back over a channel; the owner polls from its own loop (or blocks
//! with [`Dispatcher::wait`]). There is no cancellation: a request always runs
//! to completion or failure.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use retouch_ai::{EditKind, EditRequest, EditService, ServiceError};
use retouch_core::Artifact;
use tracing::{debug, info, warn};

type Outcome = Result<Artifact, ServiceError>;

struct Pending {
    kind: EditKind,
    tag: u64,
    started: Instant,
    receiver: Receiver<Outcome>,
}

/// A finished request.
#[derive(Debug)]
pub struct Completion {
    pub kind: EditKind,
    /// Caller-supplied tag from [`Dispatcher::submit`].
    pub tag: u64,
    pub elapsed: Duration,
    pub result: Outcome,
}

pub struct Dispatcher {
    service: Arc<dyn EditService>,
    pending: Option<Pending>,
}

impl Dispatcher {
    pub fn new(service: Arc<dyn EditService>) -> Self {
        Self {
            service,
            pending: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Start `request` against `image`. Returns `false` (and does nothing) while busy.
    pub fn submit(&mut self, image: Artifact, request: EditRequest, tag: u64) -> bool {
        if let Some(pending) = &self.pending {
            warn!(
                "Rejected {} request: {} still in flight",
                request.kind().noun(),
                pending.kind.noun()
            );
            return false;
        }

        let kind = request.kind();
        let (sender, receiver) = mpsc::channel();
        let service = Arc::clone(&self.service);
        info!("Dispatching {} for {}", kind.noun(), image.name());

        thread::spawn(move || {
            let outcome = request.execute(service.as_ref(), &image);
            // The receiver is gone only if the dispatcher was dropped.
            let _ = sender.send(outcome);
        });

        self.pending = Some(Pending {
            kind,
            tag,
            started: Instant::now(),
            receiver,
        });
        true
    }

    /// Non-blocking check for the outstanding request.
    pub fn poll(&mut self) -> Option<Completion> {
        let pending = self.pending.as_ref()?;
        let result = match pending.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(worker_lost()),
        };
        self.finish(result)
    }

    /// Block until the outstanding request resolves. `None` if nothing is pending.
    pub fn wait(&mut self) -> Option<Completion> {
        let pending = self.pending.as_ref()?;
        let result = pending.receiver.recv().unwrap_or_else(|_| Err(worker_lost()));
        self.finish(result)
    }

    fn finish(&mut self, result: Outcome) -> Option<Completion> {
        let pending = self.pending.take()?;
        let elapsed = pending.started.elapsed();
        debug!(
            "{} resolved after {:.2}s (ok: {})",
            pending.kind.noun(),
            elapsed.as_secs_f32(),
            result.is_ok()
        );
        Some(Completion {
            kind: pending.kind,
            tag: pending.tag,
            elapsed,
            result,
        })
    }
}

fn worker_lost() -> ServiceError {
    ServiceError::Other("the edit worker stopped before returning a result".to_string())
}
