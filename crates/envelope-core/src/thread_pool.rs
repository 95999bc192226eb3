use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::{mpsc, thread};

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Work(Job),
    Terminate,
}

/// A bounded pool of `N` long-lived worker threads (C2). Jobs are fed
/// through a channel shared by all workers; each idle worker pulls the
/// next job under the channel's internal lock. `WaitGroup` provides
/// the drain barrier that lets a caller block until every dispatched
/// job has completed, which is how `evaluate_batch` realizes spec
/// §4.2's "idle-worker semaphore" / "wait until every worker is idle
/// again" contract in channel-based terms.
pub struct ThreadPool {
    sender: mpsc::Sender<Message>,
    workers: Vec<Worker>,
}

impl ThreadPool {
    /// `size` must be at least 1.
    pub fn new(size: usize) -> Self {
        assert!(size >= 1, "thread pool size must be at least 1");
        let (sender, receiver) = mpsc::channel::<Message>();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..size)
            .map(|id| Worker::new(id, Arc::clone(&receiver)))
            .collect();

        ThreadPool { sender, workers }
    }

    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Submits a fire-and-forget job.
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender
            .send(Message::Work(Box::new(job)))
            .expect("thread pool workers outlive the pool");
    }

    /// Runs `jobs` across the pool and blocks until every job has
    /// completed, returning results in the same order as the input
    /// (spec §4.2: "results are written to each individual's own
    /// slot"; ordering of *completion* is unspecified, but the return
    /// value here is re-assembled in input order for caller
    /// convenience).
    pub fn execute_batch<T, F>(&self, jobs: Vec<F>) -> Vec<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let wait_group = WaitGroup::new();
        let slots: Arc<Mutex<Vec<Option<T>>>> = Arc::new(Mutex::new((0..jobs.len()).map(|_| None).collect()));

        for (index, job) in jobs.into_iter().enumerate() {
            let guard = wait_group.guard();
            let slots = Arc::clone(&slots);
            self.submit(move || {
                let result = job();
                slots.lock().expect("thread pool slot lock poisoned")[index] = Some(result);
                drop(guard);
            });
        }

        wait_group.wait();

        Arc::try_unwrap(slots)
            .unwrap_or_else(|_| panic!("all jobs must have released their Arc by the time wait() returns"))
            .into_inner()
            .expect("thread pool slot lock poisoned")
            .into_iter()
            .map(|slot| slot.expect("every batch slot is filled before wait() returns"))
            .collect()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for _ in &self.workers {
            let _ = self.sender.send(Message::Terminate);
        }
        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                let _ = thread.join();
            }
        }
    }
}

struct Worker {
    thread: Option<JoinHandle<()>>,
}

impl Worker {
    fn new(_id: usize, receiver: Arc<Mutex<mpsc::Receiver<Message>>>) -> Self {
        let thread = thread::spawn(move || loop {
            let message = receiver
                .lock()
                .expect("thread pool receiver lock poisoned")
                .recv();
            match message {
                Ok(Message::Work(job)) => job(),
                Ok(Message::Terminate) | Err(_) => break,
            }
        });

        Worker {
            thread: Some(thread),
        }
    }
}

struct Inner {
    counter: AtomicUsize,
    lock: Mutex<()>,
    cvar: Condvar,
}

/// Tracks a set of in-flight jobs; `wait()` blocks until every
/// [`WaitGuard`] handed out by [`WaitGroup::guard`] has been dropped.
#[derive(Clone)]
pub struct WaitGroup {
    inner: Arc<Inner>,
}

impl WaitGroup {
    pub fn new() -> Self {
        WaitGroup {
            inner: Arc::new(Inner {
                counter: AtomicUsize::new(0),
                lock: Mutex::new(()),
                cvar: Condvar::new(),
            }),
        }
    }

    pub fn guard(&self) -> WaitGuard {
        self.inner.counter.fetch_add(1, Ordering::SeqCst);
        WaitGuard {
            wg: self.clone(),
        }
    }

    pub fn count(&self) -> usize {
        self.inner.counter.load(Ordering::SeqCst)
    }

    pub fn wait(&self) {
        if self.count() == 0 {
            return;
        }
        let guard = self.inner.lock.lock().expect("wait group lock poisoned");
        let _unused = self
            .inner
            .cvar
            .wait_while(guard, |_| self.inner.counter.load(Ordering::SeqCst) != 0)
            .expect("wait group lock poisoned");
    }
}

impl Default for WaitGroup {
    fn default() -> Self {
        Self::new()
    }
}

pub struct WaitGuard {
    wg: WaitGroup,
}

impl Drop for WaitGuard {
    fn drop(&mut self) {
        if self.wg.inner.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _guard = self.wg.inner.lock.lock().expect("wait group lock poisoned");
            self.wg.inner.cvar.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize as StdAtomicUsize;

    #[test]
    fn execute_batch_preserves_input_order() {
        let pool = ThreadPool::new(4);
        let jobs: Vec<_> = (0..50).map(|i| move || i * 2).collect();
        let results = pool.execute_batch(jobs);
        let expected: Vec<i32> = (0..50).map(|i| i * 2).collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn single_worker_pool_still_runs_jobs() {
        let pool = ThreadPool::new(1);
        let results = pool.execute_batch(vec![|| 1, || 2, || 3]);
        assert_eq!(results, vec![1, 2, 3]);
    }

    #[test]
    fn wait_group_blocks_until_every_guard_drops() {
        let wg = WaitGroup::new();
        let counter = Arc::new(StdAtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let guard = wg.guard();
            let counter = Arc::clone(&counter);
            handles.push(thread::spawn(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(guard);
            }));
        }
        wg.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 8);
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn wait_group_returns_immediately_with_no_tasks() {
        let wg = WaitGroup::new();
        wg.wait();
        assert_eq!(wg.count(), 0);
    }

    #[test]
    fn drop_terminates_all_workers() {
        let pool = ThreadPool::new(3);
        assert_eq!(pool.num_workers(), 3);
        drop(pool);
    }
}
