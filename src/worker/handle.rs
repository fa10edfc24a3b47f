use crate::error::WorkerError;
use crate::messages::{ScanMessage, ScanOutcome};
use crate::pipeline::CancelToken;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

/// Receiving end of one submitted job.
#[derive(Debug)]
pub struct JobHandle {
    pub(super) reply: Receiver<ScanOutcome>,
    pub(super) cancel: CancelToken,
}

impl JobHandle {
    /// Block until the job answers. On timeout the job is cancelled and
    /// [`WorkerError::Timeout`] is returned.
    pub fn wait(self, timeout: Duration) -> Result<ScanOutcome, WorkerError> {
        match self.reply.recv_timeout(timeout) {
            Ok(outcome) => Ok(outcome),
            Err(RecvTimeoutError::Timeout) => {
                self.cancel.cancel();
                Err(WorkerError::Timeout)
            }
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    /// [`wait`](Self::wait), converted to the wire message.
    pub fn wait_message(self, timeout: Duration) -> Result<ScanMessage, WorkerError> {
        self.wait(timeout).map(|outcome| outcome.to_message())
    }

    /// Ask the worker to abandon the job at its next stage boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
