//! Deferred execution of animated re-renders.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::registrar::Animation;

/// Work deferred to the next scheduling turn.
pub struct Job {
    animation: Option<Animation>,
    task: Box<dyn FnOnce() + Send + 'static>,
}

impl Job {
    pub fn new(animation: Option<Animation>, task: impl FnOnce() + Send + 'static) -> Self {
        Self {
            animation,
            task: Box::new(task),
        }
    }

    /// Animation the job's visual changes should run inside.
    pub fn animation(&self) -> Option<Animation> {
        self.animation
    }

    pub fn run(self) {
        (self.task)()
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("animation", &self.animation)
            .finish_non_exhaustive()
    }
}

/// Accepts jobs to run on a later turn of the UI loop.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, job: Job);
}

/// Scheduler backed by the UI loop's job channel.
#[derive(Clone)]
pub struct ChannelScheduler {
    tx: mpsc::UnboundedSender<Job>,
}

impl ChannelScheduler {
    pub fn new(tx: mpsc::UnboundedSender<Job>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Job>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl Scheduler for ChannelScheduler {
    fn schedule(&self, job: Job) {
        if self.tx.send(job).is_err() {
            tracing::debug!("UI loop gone, dropping scheduled job");
        }
    }
}

/// Scheduler that queues jobs until [`QueueScheduler::run_pending`].
#[derive(Clone, Default)]
pub struct QueueScheduler {
    queue: Arc<Mutex<VecDeque<Job>>>,
}

impl QueueScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Run every job queued so far, one turn. Jobs scheduled while running
    /// wait for the next call. Returns the number of jobs run.
    pub fn run_pending(&self) -> usize {
        let turn: Vec<Job> = self.queue.lock().drain(..).collect();
        let ran = turn.len();
        for job in turn {
            job.run();
        }
        ran
    }
}

impl Scheduler for QueueScheduler {
    fn schedule(&self, job: Job) {
        self.queue.lock().push_back(job);
    }
}
