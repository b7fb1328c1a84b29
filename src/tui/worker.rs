//! Background worker for checkups and voice commands.
//!
//! Training, listening and speech playback all block, so each user action
//! runs on its own thread while the TUI keeps redrawing. The App holds at
//! most one handle at a time.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::application::{Session, Stage, VoiceOutcome};
use crate::domain::{HealthRecord, Report};
use crate::ports::{SpeechRecognizer, Trainer};
use crate::DiacheckError;

/// Work handed to the background thread.
pub enum Job {
    /// Run the checkup for a validated record
    Check(HealthRecord),
    /// Listen for one command and act on it
    Voice(Box<dyn SpeechRecognizer>),
}

/// Progress updates from the worker.
#[derive(Debug, Clone)]
pub enum WorkerProgress {
    /// Recognizer started
    Listening,
    /// A workflow stage started
    Stage(Stage),
    /// Checkup finished
    Checked(Report),
    /// Voice command handled
    Voice(VoiceOutcome),
    /// The action failed; `warning` marks recoverable conditions
    Failed { message: String, warning: bool },
}

/// Handle to a running worker.
pub struct CheckupWorkerHandle {
    progress_rx: Receiver<WorkerProgress>,
    _handle: JoinHandle<()>,
}

impl CheckupWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<WorkerProgress> {
        self.progress_rx.try_recv().ok()
    }
}

pub struct CheckupWorker;

impl CheckupWorker {
    /// Spawn a background job.
    pub fn spawn<T>(session: Arc<Mutex<Session<T>>>, job: Job) -> CheckupWorkerHandle
    where
        T: Trainer + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = Self::run_job(&session, job, &tx);
            if let Err(e) = result {
                let _ = tx.send(WorkerProgress::Failed {
                    message: e.to_string(),
                    warning: e.is_warning(),
                });
            }
        });

        CheckupWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_job<T: Trainer>(
        session: &Mutex<Session<T>>,
        job: Job,
        tx: &Sender<WorkerProgress>,
    ) -> Result<(), DiacheckError> {
        let mut session = session.lock().map_err(|_| DiacheckError::LockPoisoned)?;
        let progress = |stage| {
            let _ = tx.send(WorkerProgress::Stage(stage));
        };

        match job {
            Job::Check(record) => {
                let report = session.submit_with_progress(record, progress)?;
                let _ = tx.send(WorkerProgress::Checked(report));
            }
            Job::Voice(recognizer) => {
                let _ = tx.send(WorkerProgress::Listening);
                let outcome = session.voice_command_with_progress(recognizer.as_ref(), progress)?;
                let _ = tx.send(WorkerProgress::Voice(outcome));
            }
        }
        Ok(())
    }
}
