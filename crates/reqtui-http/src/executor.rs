use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crate::pipeline::{self, CapturedResponse, SubmitError};
use crate::transport::{ReqwestTransport, Transport, WireRequest};

/// The result received from the executor thread, with the time the request
/// was handed over.
pub struct ExecutorResult {
    pub outcome: Result<CapturedResponse, SubmitError>,
    pub started: Instant,
}

struct Job {
    request: WireRequest,
    started: Instant,
}

/// Sender/Receiver pair for communicating with the executor.
///
/// The UI thread never blocks on the network: it sends a job and polls for
/// the result on its tick.
pub struct HttpExecutor {
    sender: mpsc::Sender<Job>,
    receiver: mpsc::Receiver<ExecutorResult>,
}

impl HttpExecutor {
    /// Spawn the background executor thread using the real network.
    pub fn spawn() -> Self {
        Self::spawn_with(ReqwestTransport::new())
    }

    /// Spawn the background executor thread with a tokio runtime.
    pub fn spawn_with<T>(transport: T) -> Self
    where
        T: Transport + Send + 'static,
    {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (result_tx, result_rx) = mpsc::channel::<ExecutorResult>();

        thread::spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!(error = %e, "failed to create tokio runtime");
                    // Fail every job instead of leaving the UI waiting
                    while let Ok(job) = job_rx.recv() {
                        let outcome = Err(SubmitError::Executor(format!(
                            "failed to create runtime: {e}"
                        )));
                        let result = ExecutorResult {
                            outcome,
                            started: job.started,
                        };
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                    return;
                }
            };

            rt.block_on(async move {
                while let Ok(job) = job_rx.recv() {
                    let outcome = pipeline::execute(&transport, job.request).await;
                    let result = ExecutorResult {
                        outcome,
                        started: job.started,
                    };
                    if result_tx.send(result).is_err() {
                        break; // Main thread dropped the receiver
                    }
                }
            });
        });

        Self {
            sender: job_tx,
            receiver: result_rx,
        }
    }

    /// Send a request (non-blocking).
    pub fn send(&self, request: WireRequest) -> Result<(), SubmitError> {
        let job = Job {
            request,
            started: Instant::now(),
        };
        self.sender
            .send(job)
            .map_err(|_| SubmitError::Executor("request executor is not running".to_string()))
    }

    /// Try to receive a result (non-blocking).
    pub fn try_recv(&self) -> Option<ExecutorResult> {
        self.receiver.try_recv().ok()
    }
}
