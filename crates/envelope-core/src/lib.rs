//! Core primitives for the `envelope` multi-objective evolutionary
//! optimization engine: chromosomes and fitness vectors, the
//! `Genetics` capability trait, Pareto dominance, the PESA density
//! kernel and NSGA-II rank/crowding, the mutation-rate annealing
//! schedule, a bounded worker-thread pool, and the engine's
//! configuration record.

mod chromosome;
mod config;
mod density;
mod dominance;
mod executor;
mod fitness;
mod genetics;
mod individual;
mod progress;
mod rate;
mod rng;
mod thread_pool;

pub use chromosome::Chromosome;
pub use config::{Algorithm, EngineConfig};
pub use density::{crowding_distance, gaussian, kernel, rank, FitnessBox, Sigmas};
pub use dominance::dominates;
pub use executor::{evaluate_batch, Executor};
pub use fitness::{scanning_order, Fitness};
pub use genetics::Genetics;
pub use individual::{Individual, OrderedScore, Score};
pub use progress::{NullProgressListener, ProgressListener};
pub use rate::MutationSchedule;
pub use rng::EngineRng;
pub use thread_pool::{ThreadPool, WaitGroup, WaitGuard};

pub use envelope_error::{EnvelopeError, Result};
