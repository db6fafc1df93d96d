//! Runs one upload off the UI thread and hands the outcome back over a channel.

use seed_core::{AnalysisBatch, SelectedFile, Transport, UploadClient, UploadError};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

pub(super) struct UploadJob {
    rx: Receiver<Result<AnalysisBatch, UploadError>>,
    started: Instant,
    file_count: usize,
}

/// Outcome of polling a running job.
pub(super) enum JobPoll {
    Running,
    Finished {
        outcome: Result<AnalysisBatch, UploadError>,
        elapsed: Duration,
    },
}

impl UploadJob {
    /// Spawn the worker. `on_done` runs on the worker after the outcome is sent,
    /// typically to request a repaint.
    pub(super) fn spawn<T, F>(
        client: UploadClient<T>,
        files: Vec<SelectedFile>,
        on_done: F,
    ) -> Self
    where
        T: Transport + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let file_count = files.len();
        thread::spawn(move || {
            let outcome = client.upload(&files);
            let _ = tx.send(outcome);
            on_done();
        });
        Self {
            rx,
            started: Instant::now(),
            file_count,
        }
    }

    pub(super) fn file_count(&self) -> usize {
        self.file_count
    }

    pub(super) fn poll(&self) -> JobPoll {
        match self.rx.try_recv() {
            Ok(outcome) => JobPoll::Finished {
                outcome,
                elapsed: self.started.elapsed(),
            },
            Err(TryRecvError::Empty) => JobPoll::Running,
            Err(TryRecvError::Disconnected) => JobPoll::Finished {
                outcome: Err(UploadError::UploadFailed(
                    "upload worker stopped unexpectedly".into(),
                )),
                elapsed: self.started.elapsed(),
            },
        }
    }
}
