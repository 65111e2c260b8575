//! Single-consumer FIFO job queue.
//!
//! Long-running pipeline work is serialized through one worker thread: at
//! most one job executes at a time per process, in submission order.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Sender};
use tracing::{error, info};

use crate::error::{OrchestrationError, Result};

struct QueuedJob {
    name: String,
    task: Box<dyn FnOnce() + Send + 'static>,
}

/// Bounded FIFO queue with one consumer thread.
pub struct JobQueue {
    sender: Option<Sender<QueuedJob>>,
    worker: Option<JoinHandle<()>>,
}

impl JobQueue {
    /// Starts the consumer thread. `capacity` bounds the backlog; submission
    /// blocks once it is full.
    pub fn start(capacity: usize) -> Self {
        let (sender, receiver) = bounded::<QueuedJob>(capacity);

        let worker = std::thread::spawn(move || {
            info!("Started queue consumer thread");
            while let Ok(job) = receiver.recv() {
                info!("Got a job from queue: {}", job.name);
                let name = job.name;
                match catch_unwind(AssertUnwindSafe(job.task)) {
                    Ok(()) => info!("Finished job from queue: {}", name),
                    Err(_) => error!("Error processing job from queue: {}", name),
                }
            }
            info!("Queue consumer thread exiting");
        });

        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Enqueues a job; blocks while the backlog is full.
    pub fn submit(&self, name: impl Into<String>, task: impl FnOnce() + Send + 'static) -> Result<()> {
        let job = QueuedJob {
            name: name.into(),
            task: Box::new(task),
        };
        self.sender
            .as_ref()
            .ok_or(OrchestrationError::QueueClosed)?
            .send(job)
            .map_err(|_| OrchestrationError::QueueClosed)
    }

    /// Drains the backlog and stops the consumer thread.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        // Dropping the sender ends the consumer's recv loop.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Queue consumer thread panicked");
            }
        }
    }
}

impl Drop for JobQueue {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_jobs_run_in_submission_order() {
        let order: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
        let queue = JobQueue::start(20);

        for i in 0..5 {
            let order = Arc::clone(&order);
            queue
                .submit(format!("job-{}", i), move || {
                    order.lock().unwrap().push(i);
                })
                .unwrap();
        }

        queue.shutdown();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_panicking_job_does_not_kill_the_worker() {
        let ran: Arc<Mutex<bool>> = Arc::new(Mutex::new(false));
        let queue = JobQueue::start(4);

        queue.submit("exploding", || panic!("boom")).unwrap();
        let ran_clone = Arc::clone(&ran);
        queue
            .submit("survivor", move || {
                *ran_clone.lock().unwrap() = true;
            })
            .unwrap();

        queue.shutdown();
        assert!(*ran.lock().unwrap());
    }

    #[test]
    fn test_submit_on_closed_queue_fails() {
        let queue = JobQueue {
            sender: None,
            worker: None,
        };
        assert!(matches!(
            queue.submit("late", || {}),
            Err(OrchestrationError::QueueClosed)
        ));
    }
}
