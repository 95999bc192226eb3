use envelope_error::{EnvelopeError, Result};

/// Selects which of the two shared-machinery algorithms drives the
/// evolution loop (spec §9: "this becomes a sum type with two
/// variants... sharing composed collaborators").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    Pesa,
    Nsga2,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Pesa => "PESA",
            Algorithm::Nsga2 => "NSGA2",
        }
    }
}

/// The engine's configuration record (spec §6). Every field has a
/// default matching the spec's table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    pub crossover_probability: f64,
    pub initial_mutation_rate: f64,
    pub final_mutation_rate: f64,
    pub mutation_decay_rate: f64,
    pub external_population_size: usize,
    pub internal_population_size: usize,
    pub fitness_space_dimensionality: usize,
    pub num_of_iterations: u64,
    pub log_all_evaluations: bool,
    pub fitness_space_partition: f64,
    pub sort_result: bool,
    pub number_of_threads: usize,
    pub log_front: bool,
    pub log_filename: String,
    pub create_front_file: bool,
    pub front_file: String,
    pub algorithm: Algorithm,
    pub random_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            crossover_probability: 0.7,
            initial_mutation_rate: -1.0,
            final_mutation_rate: -1.0,
            mutation_decay_rate: 33.38,
            external_population_size: 100,
            internal_population_size: 10,
            fitness_space_dimensionality: 2,
            num_of_iterations: 1000,
            log_all_evaluations: false,
            fitness_space_partition: 32.0,
            sort_result: true,
            number_of_threads: 1,
            log_front: true,
            log_filename: "pareto.log".to_string(),
            create_front_file: false,
            front_file: "pareto.pf".to_string(),
            algorithm: Algorithm::Pesa,
            random_seed: None,
        }
    }
}

impl EngineConfig {
    /// Validates the parameter combinations spec §7 names as
    /// `ConfigError` conditions. Surfaced before any work starts.
    pub fn validate(&self) -> Result<()> {
        if self.mutation_decay_rate <= 0.0 {
            return Err(EnvelopeError::config("mutationDecayRate must be strictly positive"));
        }
        if self.fitness_space_dimensionality == 0 {
            return Err(EnvelopeError::config("fitnessSpaceDimensionality must be > 0"));
        }
        if self.internal_population_size == 0 {
            return Err(EnvelopeError::config("internalPopulationSize must be > 0"));
        }
        if self.external_population_size == 0 {
            return Err(EnvelopeError::config("externalPopulationSize must be > 0"));
        }
        if self.number_of_threads < 1 {
            return Err(EnvelopeError::config("numberOfThreads must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(EnvelopeError::config("crossoverProbability must be in [0, 1]"));
        }
        if self.fitness_space_partition <= 0.0 {
            return Err(EnvelopeError::config("fitnessSpacePartition must be strictly positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn non_positive_decay_rate_is_rejected() {
        let mut config = EngineConfig::default();
        config.mutation_decay_rate = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_threads_is_rejected() {
        let mut config = EngineConfig::default();
        config.number_of_threads = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn crossover_probability_out_of_range_is_rejected() {
        let mut config = EngineConfig::default();
        config.crossover_probability = 1.5;
        assert!(config.validate().is_err());
    }
}
