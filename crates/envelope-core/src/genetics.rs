use crate::chromosome::Chromosome;
use crate::fitness::Fitness;
use envelope_error::Result;

/// The sole bridge to the user's problem (C1). The engine never
/// interprets chromosome bits itself; every piece of domain knowledge
/// — initialization, evaluation, crossover, mutation, and decoding to
/// a phenotype — is delegated here.
///
/// `P` is the phenotype type, produced only at the boundary for the
/// final front file; it plays no role in the evolution loop itself.
///
/// # Thread safety
///
/// The core may call [`Genetics::evaluate`] from multiple worker
/// threads concurrently (C2). Implementations must not mutate shared
/// state from `evaluate` without their own synchronization; every
/// other method is called only from the evolution-loop thread.
pub trait Genetics<P>: Send + Sync {
    /// The fixed chromosome length `L` for this problem.
    fn chromosome_size(&self) -> usize;

    /// Produces one random initial chromosome. `seed_index` is the
    /// candidate's position in the initialization attempt sequence
    /// (not necessarily the eventual population slot), offered so
    /// implementations can vary deterministically-seeded output
    /// without drawing from a shared RNG.
    fn init_individual(&self, seed_index: u64) -> Result<Chromosome>;

    /// Evaluates one chromosome. Returns the fitness vector and a
    /// success flag; on failure the core substitutes the worst
    /// fitness (all zero) and continues (spec §7).
    fn evaluate(&self, chromosome: &Chromosome) -> (Fitness, bool);

    /// Uniform bit crossover of two parents followed by independent
    /// bit-flip mutation at `mutation_rate` (the spec-mandated
    /// default; implementations may do something else entirely).
    fn crossover(&self, a: &Chromosome, b: &Chromosome, mutation_rate: f64) -> Chromosome;

    /// Bit-flip mutation of a single parent at `mutation_rate`.
    fn mutate(&self, parent: &Chromosome, mutation_rate: f64) -> Chromosome;

    /// Decodes a chromosome into the opaque phenotype used only when
    /// writing the final front file.
    fn chromosome_to_phenotype(&self, chromosome: &Chromosome) -> P;

    /// A short name recorded in the log header, identifying which
    /// `Genetics` produced the run (for diagnostic purposes only).
    fn name(&self) -> &str {
        "genetics"
    }

    /// Optional free-form state serialized into the log header
    /// alongside [`Genetics::name`]. Implementations that need to
    /// reproduce their own internal RNG or parameters across a resume
    /// can populate this; the default is empty (nothing to restore).
    fn serialize_state(&self) -> Option<String> {
        None
    }
}
