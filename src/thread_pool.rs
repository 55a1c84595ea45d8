use anyhow::{anyhow, bail, Context, Result};
use log::{error, trace};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::{mpsc, Arc, Mutex},
    thread,
};

pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: Option<mpsc::Sender<Job>>,
}

type Job = Box<dyn FnOnce() + Send + 'static>;

impl ThreadPool {
    /// Create a new ThreadPool.
    ///
    /// The size is the number of threads in the pool and must be non-zero.
    pub fn new(size: usize) -> Result<ThreadPool> {
        if size == 0 {
            bail!("thread pool needs at least one worker");
        }

        let (sender, receiver) = mpsc::channel();

        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            workers.push(Worker::new(id, Arc::clone(&receiver))?);
        }

        Ok(ThreadPool {
            workers,
            sender: Some(sender),
        })
    }

    pub fn execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let job = Box::new(f);

        self.sender
            .as_ref()
            .context("thread pool is shutting down")?
            .send(job)
            .map_err(|_| anyhow!("every worker has stopped"))
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        drop(self.sender.take());

        for worker in &mut self.workers {
            trace!("shutting down worker {}", worker.id);

            if let Some(thread) = worker.thread.take() {
                let _ = thread.join();
            }
        }
    }
}

struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(id: usize, receiver: Arc<Mutex<mpsc::Receiver<Job>>>) -> Result<Worker> {
        let builder = thread::Builder::new().name(format!("worker-{id}"));
        let thread = builder.spawn(move || loop {
            let message = match receiver.lock() {
                Ok(receiver) => receiver.recv(),
                Err(_) => break,
            };

            match message {
                Ok(job) => {
                    trace!("worker {id} got a job; executing.");
                    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        error!("worker {id} job panicked; worker keeps running");
                    }
                }
                Err(_) => {
                    trace!("worker {id} disconnected; shutting down.");
                    break;
                }
            }
        })?;

        Ok(Worker {
            id,
            thread: Some(thread),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_zero_size_err() {
        assert!(ThreadPool::new(0).is_err());
    }

    #[test]
    fn test_runs_every_job_before_drop_returns() {
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let pool = ThreadPool::new(3).unwrap();
            for _ in 0..20 {
                let counter = Arc::clone(&counter);
                pool.execute(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
        }

        assert_eq!(20, counter.load(Ordering::SeqCst));
    }

    #[test]
    fn test_panicking_job_keeps_worker_alive() {
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let pool = ThreadPool::new(1).unwrap();
            pool.execute(|| panic!("job failed")).unwrap();

            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        assert_eq!(1, counter.load(Ordering::SeqCst));
    }
}
