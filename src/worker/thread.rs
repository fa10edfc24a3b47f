use super::handle::JobHandle;
use crate::error::WorkerError;
use crate::messages::{ScanOutcome, ScanRequest};
use crate::pipeline::{CancelToken, OmrParams, OmrPipeline};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

struct Job {
    request: ScanRequest,
    cancel: CancelToken,
    reply: Sender<ScanOutcome>,
}

type ReadySignal = Result<(), String>;

/// Holds the single job slot; clears `busy` when dropped, unwinding included.
struct BusySlot<'a>(&'a AtomicBool);

impl Drop for BusySlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owner of the worker thread. Dropping it closes the job channel and joins
/// the thread.
pub struct OmrWorker {
    jobs: Option<Sender<Job>>,
    ready_rx: Receiver<ReadySignal>,
    init: Option<Result<(), WorkerError>>,
    ready: Arc<AtomicBool>,
    busy: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl OmrWorker {
    /// Start the worker thread. The pipeline is built on that thread; use
    /// [`wait_ready`](Self::wait_ready) to learn whether it succeeded.
    pub fn spawn(params: OmrParams) -> Result<Self, WorkerError> {
        let (jobs_tx, jobs_rx) = mpsc::channel::<Job>();
        let (ready_tx, ready_rx) = mpsc::channel::<ReadySignal>();
        let ready = Arc::new(AtomicBool::new(false));
        let busy = Arc::new(AtomicBool::new(false));

        let thread = {
            let ready = Arc::clone(&ready);
            let busy = Arc::clone(&busy);
            thread::Builder::new()
                .name("omr-worker".to_string())
                .spawn(move || serve(params, jobs_rx, ready_tx, ready, busy))
                .map_err(|e| WorkerError::Init(format!("failed to spawn worker thread: {e}")))?
        };

        Ok(Self {
            jobs: Some(jobs_tx),
            ready_rx,
            init: None,
            ready,
            busy,
            thread: Some(thread),
        })
    }

    /// Block until the pipeline is built, at most `timeout`.
    ///
    /// The first definitive answer is remembered; a timeout is not, so the
    /// call can be retried.
    pub fn wait_ready(&mut self, timeout: Duration) -> Result<(), WorkerError> {
        if let Some(init) = &self.init {
            return init.clone();
        }
        let result = match self.ready_rx.recv_timeout(timeout) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(reason)) => Err(WorkerError::Init(reason)),
            Err(RecvTimeoutError::Timeout) => return Err(WorkerError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Disconnected),
        };
        self.init = Some(result.clone());
        result
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// True while a job is being processed.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Hand one request to the worker.
    pub fn submit(&self, request: ScanRequest) -> Result<JobHandle, WorkerError> {
        if !self.is_ready() {
            return Err(WorkerError::NotReady);
        }
        let jobs = self.jobs.as_ref().ok_or(WorkerError::Disconnected)?;
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(WorkerError::Busy);
        }
        let (reply_tx, reply_rx) = mpsc::channel();
        let cancel = CancelToken::new();
        let job = Job {
            request,
            cancel: cancel.clone(),
            reply: reply_tx,
        };
        if jobs.send(job).is_err() {
            self.busy.store(false, Ordering::SeqCst);
            return Err(WorkerError::Disconnected);
        }
        Ok(JobHandle {
            reply: reply_rx,
            cancel,
        })
    }

    /// Close the job channel and join the thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.jobs.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("omr worker thread panicked");
            }
        }
    }
}

impl Drop for OmrWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn serve(
    params: OmrParams,
    jobs: Receiver<Job>,
    ready_tx: Sender<ReadySignal>,
    ready: Arc<AtomicBool>,
    busy: Arc<AtomicBool>,
) {
    let pipeline = match OmrPipeline::new(params) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            warn!("omr worker failed to initialise: {err}");
            let _ = ready_tx.send(Err(err.to_string()));
            return;
        }
    };
    ready.store(true, Ordering::SeqCst);
    let _ = ready_tx.send(Ok(()));
    info!("omr worker ready");

    for job in jobs {
        debug!(
            "omr worker job num_questions={:?} payload_bytes={}",
            job.request.num_questions,
            job.request.image_data_url.len()
        );
        // the slot is released before replying so the receiver can submit again
        let outcome = {
            let _slot = BusySlot(&busy);
            pipeline.run_cancellable(&job.request, &job.cancel)
        };
        if job.reply.send(outcome).is_err() {
            debug!("omr worker reply dropped by submitter");
        }
    }
    debug!("omr worker job channel closed");
}
