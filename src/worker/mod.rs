//! Background scan worker.
//!
//! [`OmrWorker::spawn`] starts one dedicated thread that builds the
//! [`OmrPipeline`](crate::OmrPipeline) once and then serves jobs sent over a
//! channel. Readiness is signalled through a one-shot channel and awaited
//! with [`OmrWorker::wait_ready`]. At most one job is in flight: a second
//! [`OmrWorker::submit`] while the first is running fails with
//! [`WorkerError::Busy`](crate::WorkerError::Busy). Each job answers with
//! exactly one [`ScanOutcome`](crate::messages::ScanOutcome) on its own reply
//! channel.

mod handle;
mod thread;

pub use handle::JobHandle;
pub use thread::OmrWorker;
