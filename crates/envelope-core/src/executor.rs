use std::sync::Arc;

use crate::chromosome::Chromosome;
use crate::fitness::Fitness;
use crate::genetics::Genetics;
use crate::thread_pool::ThreadPool;

/// Selects between caller-thread evaluation and a bounded worker
/// pool (C2). `numberOfThreads == 1` resolves to [`Executor::Serial`]
/// so "no worker machinery is activated" (spec §4.2).
pub enum Executor {
    Serial,
    WorkerPool(ThreadPool),
}

impl Executor {
    pub fn new(num_threads: usize) -> Self {
        if num_threads <= 1 {
            Executor::Serial
        } else {
            Executor::WorkerPool(ThreadPool::new(num_threads))
        }
    }

    pub fn num_workers(&self) -> usize {
        match self {
            Executor::Serial => 1,
            Executor::WorkerPool(pool) => pool.num_workers(),
        }
    }
}

/// Evaluates every chromosome in `chromosomes`, returning
/// `(fitness, success)` pairs in input order (C2's `evaluateBatch`
/// contract). The call returns only after every chromosome has been
/// evaluated, regardless of which executor is in use.
pub fn evaluate_batch<P, G>(
    executor: &Executor,
    genetics: &Arc<G>,
    chromosomes: &[Chromosome],
) -> Vec<(Fitness, bool)>
where
    G: Genetics<P> + 'static,
{
    match executor {
        Executor::Serial => chromosomes.iter().map(|c| genetics.evaluate(c)).collect(),
        Executor::WorkerPool(pool) => {
            let jobs: Vec<_> = chromosomes
                .iter()
                .cloned()
                .map(|chromosome| {
                    let genetics = Arc::clone(genetics);
                    move || genetics.evaluate(&chromosome)
                })
                .collect();
            pool.execute_batch(jobs)
        }
    }
}
