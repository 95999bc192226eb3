use std::fmt::Debug;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use envelope_core::{
    evaluate_batch, Algorithm, Chromosome, EngineConfig, EngineRng, Executor, Fitness, FitnessBox,
    Genetics, Individual, MutationSchedule, NullProgressListener, ProgressListener, Sigmas,
};
use envelope_error::{EnvelopeError, Result};
use envelope_log::{load_for_resume, Header, LogWriter};

use crate::archive::{AdmissionOutcome, Archive};
use crate::front_file::write_front_file;
use crate::variation::{mutation_rate_at, produce_children};

const MAX_CONSECUTIVE_INIT_REJECTIONS: u64 = 1_000_000;

/// Formats a per-iteration progress report: front size, new
/// admissions, and an elapsed/estimated-remaining time derived from
/// the average iteration cost so far (spec §4.7 "Progress reporting").
/// Reporting is advisory only and never feeds back into the loop.
fn progress_summary(
    iteration: u64,
    num_of_iterations: u64,
    front_size: usize,
    new_admissions: usize,
    elapsed: std::time::Duration,
) -> String {
    let done = iteration + 1;
    let remaining = num_of_iterations.saturating_sub(done);
    let per_iteration = elapsed.as_secs_f64() / done.max(1) as f64;
    let estimated_remaining = std::time::Duration::from_secs_f64(per_iteration * remaining as f64);
    format!(
        "iteration {done}/{num_of_iterations}: front size {front_size}, {new_admissions} new, \
         elapsed {elapsed:.1?}, estimated remaining {estimated_remaining:.1?}"
    )
}

/// Validates configuration and binds a `Genetics` capability before
/// any work starts (spec §7: `ConfigError`/`GeneticsBindError` are
/// both surfaced at construction time, never mid-run).
pub struct EngineBuilder<P, G: Genetics<P> + 'static> {
    config: EngineConfig,
    genetics: Option<Arc<G>>,
    progress: Option<Arc<dyn ProgressListener>>,
    _marker: PhantomData<P>,
}

impl<P, G: Genetics<P> + 'static> EngineBuilder<P, G> {
    pub fn new(config: EngineConfig) -> Self {
        EngineBuilder {
            config,
            genetics: None,
            progress: None,
            _marker: PhantomData,
        }
    }

    pub fn genetics(mut self, genetics: G) -> Self {
        self.genetics = Some(Arc::new(genetics));
        self
    }

    pub fn progress(mut self, progress: Arc<dyn ProgressListener>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn build(self) -> Result<Engine<P, G>> {
        self.config.validate()?;
        let genetics = self
            .genetics
            .ok_or_else(|| EnvelopeError::genetics_bind("no Genetics capability was installed"))?;
        if genetics.chromosome_size() == 0 {
            return Err(EnvelopeError::genetics_bind("chromosome_size() must be > 0"));
        }
        let executor = Executor::new(self.config.number_of_threads);
        let progress = self.progress.unwrap_or_else(|| Arc::new(NullProgressListener));
        Ok(Engine {
            config: self.config,
            genetics,
            executor,
            progress,
            _marker: PhantomData,
        })
    }
}

/// The result of a `run`/`resume` call (spec §6 "Interfaces exposed"
/// and §7's propagation policy: "all other errors halt the run
/// immediately... partial results already in E are still returned to
/// the caller, together with the error"). `Cancelled` is not an error
/// variant here — a clean stop sets `status` and leaves `error` empty.
pub struct RunOutcome {
    pub archive: Vec<Individual>,
    pub status: String,
    pub error: Option<EnvelopeError>,
    pub iterations_completed: u64,
}

/// The bound evolution loop (C7): owns its configuration, `Genetics`
/// capability, worker executor, and optional progress listener, and
/// drives the iteration state machine to completion, a clean stop, or
/// an aborting error.
pub struct Engine<P, G: Genetics<P> + 'static> {
    config: EngineConfig,
    genetics: Arc<G>,
    executor: Executor,
    progress: Arc<dyn ProgressListener>,
    _marker: PhantomData<P>,
}

impl<P: Debug, G: Genetics<P> + 'static> Engine<P, G> {
    /// Runs the evolution loop. `resume` selects whether to rebuild
    /// state from the configured log (spec §4.7/§4.8) or start fresh.
    pub fn run(&self, resume: bool) -> Result<RunOutcome> {
        self.config.validate()?;
        let chromosome_len = self.genetics.chromosome_size();
        if chromosome_len == 0 {
            return Err(EnvelopeError::genetics_bind("chromosome_size() must be > 0"));
        }

        let mut rng = match self.config.random_seed {
            Some(seed) => EngineRng::from_seed(seed),
            None => EngineRng::from_entropy(),
        };

        let mut archive = Archive::new(self.config.external_population_size);
        let mut bbox = FitnessBox::new(self.config.fitness_space_dimensionality);
        let log_path = self.config.log_front.then(|| PathBuf::from(&self.config.log_filename));

        let mut start_iteration = 0u64;
        let mut resumed_internal: Option<Vec<Chromosome>> = None;
        let mut writer = if resume {
            let path = log_path
                .as_ref()
                .ok_or_else(|| EnvelopeError::config("resume requires logFront to have been enabled"))?;
            let resumed = load_for_resume(path)?;
            for (fitness, _) in &resumed.records {
                bbox.extend(fitness);
            }
            // spec §4.7: "reconstruct I and E from the log". I is
            // seeded from the chromosomes nearest the point the run
            // stopped — the tail of the record stream — matching
            // ltiPESA.cpp's reload-into-PI pattern; any shortfall
            // against internalPopulationSize is padded with fresh
            // random individuals below, same as the "Additional random
            // individuals are generated to fill I up to the internal
            // size" clause.
            resumed_internal = Some(
                resumed
                    .records
                    .iter()
                    .rev()
                    .take(self.config.internal_population_size)
                    .map(|(_, chromosome)| chromosome.clone())
                    .collect(),
            );
            // The log holds every individual ever admitted across the
            // whole run history, not just the current front (eviction
            // never rewrites earlier lines) — an individual logged at
            // iteration 3 can since have been dominated by one logged
            // at iteration 9. Pushing the raw records straight into
            // the archive would skip dominance filtering and the cap
            // entirely. Route the full history through the same
            // admission path a fresh candidate batch uses instead, so
            // the rebuilt archive is non-dominated and within the cap
            // from the start, matching how the original reloads the
            // log into PI and replays it through PESA::insert.
            let seed_sigmas = Sigmas::recompute(&bbox, self.config.fitness_space_partition);
            let candidates: Vec<(Chromosome, Fitness)> = resumed
                .records
                .into_iter()
                .map(|(fitness, chromosome)| (chromosome, fitness))
                .collect();
            match self.config.algorithm {
                Algorithm::Pesa => {
                    archive.admit_pesa(candidates, &seed_sigmas);
                }
                Algorithm::Nsga2 => {
                    archive.admit_nsga2(candidates);
                }
            }
            start_iteration = resumed.start_iteration;
            info!(start_iteration, restored = archive.len(), "resumed from log");
            if self.config.log_front {
                Some(LogWriter::append(path)?)
            } else {
                None
            }
        } else if let Some(path) = log_path.as_ref() {
            let header = Header {
                config: self.config.clone(),
                chromosome_length: chromosome_len,
                genetics_name: self.genetics.name().to_string(),
                genetics_state: self.genetics.serialize_state(),
            };
            Some(LogWriter::create(path, &header)?)
        } else {
            None
        };

        let mut sigmas = Sigmas::recompute(&bbox, self.config.fitness_space_partition);
        match self.config.algorithm {
            Algorithm::Pesa => archive.rescore_pesa(&sigmas),
            Algorithm::Nsga2 => archive.recompute_nsga2_scores(),
        }

        let mutation_schedule = MutationSchedule::new(
            self.config.initial_mutation_rate,
            self.config.final_mutation_rate,
            self.config.mutation_decay_rate,
            chromosome_len,
        );

        // spec §4.7: a fresh run starts I as internalPopulationSize
        // freshly-initialized individuals; a resumed run reconstructs
        // I from the log first (above) and only tops up with fresh
        // random individuals to reach the internal size.
        let mut internal = self.fill_population(resumed_internal.unwrap_or_default())?;

        let started_at = Instant::now();
        let mut iteration = start_iteration;
        let mut outcome = loop {
            self.progress.step("evaluate");
            let evaluated = evaluate_batch(&self.executor, &self.genetics, &internal);
            if evaluated.iter().all(|(_, ok)| !ok) {
                let err = EnvelopeError::all_evals_failed(format!(
                    "all {} evaluations failed at iteration {iteration}",
                    evaluated.len()
                ));
                error!(iteration, "all evaluations in the batch failed");
                break RunOutcome {
                    archive: archive.into_individuals(),
                    status: "all evaluations failed".to_string(),
                    error: Some(err),
                    iterations_completed: iteration,
                };
            }

            let candidates: Vec<(Chromosome, Fitness)> = internal
                .iter()
                .cloned()
                .zip(evaluated)
                .enumerate()
                .map(|(index, (chromosome, (fitness, ok)))| {
                    if ok {
                        self.progress.substep(index, "evaluated");
                        (chromosome, fitness)
                    } else {
                        warn!(iteration, "evaluation failed, substituting worst fitness");
                        self.progress.substep(index, "evaluation failed, using worst fitness");
                        (chromosome, Fitness::worst(self.config.fitness_space_dimensionality))
                    }
                })
                .collect();

            let mut box_changed = false;
            for (_, fitness) in &candidates {
                if bbox.extend(fitness) {
                    box_changed = true;
                }
            }
            if box_changed {
                sigmas = Sigmas::recompute(&bbox, self.config.fitness_space_partition);
                if matches!(self.config.algorithm, Algorithm::Pesa) {
                    archive.rescore_pesa(&sigmas);
                }
            }

            self.progress.step("admit");
            let report = match self.config.algorithm {
                Algorithm::Pesa => archive.admit_pesa(candidates, &sigmas),
                Algorithm::Nsga2 => archive.admit_nsga2(candidates),
            };

            if let Some(writer) = writer.as_mut() {
                for admission in &report.outcomes {
                    match admission {
                        AdmissionOutcome::Admitted { fitness, chromosome } => {
                            writer.append_record(fitness, chromosome, false)?;
                        }
                        AdmissionOutcome::Dead { fitness, chromosome } => {
                            if self.config.log_all_evaluations {
                                writer.append_record(fitness, chromosome, true)?;
                            }
                        }
                    }
                }
                writer.append_iteration_marker(iteration, archive.len(), report.inserted)?;
                writer.flush()?;
            }

            debug!(
                iteration,
                front_size = archive.len(),
                new_admissions = report.inserted,
                "iteration complete"
            );
            self.progress.step(&progress_summary(
                iteration,
                self.config.num_of_iterations,
                archive.len(),
                report.inserted,
                started_at.elapsed(),
            ));

            if iteration + 1 >= self.config.num_of_iterations {
                info!(iteration, front_size = archive.len(), "run completed");
                break RunOutcome {
                    archive: archive.into_individuals(),
                    status: "completed".to_string(),
                    error: None,
                    iterations_completed: iteration + 1,
                };
            }

            if self.progress.break_requested() {
                info!(iteration, front_size = archive.len(), "run stopped by caller");
                break RunOutcome {
                    archive: archive.into_individuals(),
                    status: "stopped by user".to_string(),
                    error: None,
                    iterations_completed: iteration + 1,
                };
            }

            self.progress.step("vary");
            let rate = mutation_rate_at(&mutation_schedule, iteration + 1);
            internal = produce_children(
                archive.individuals(),
                self.genetics.as_ref(),
                self.config.internal_population_size,
                self.config.crossover_probability,
                rate,
                &mut rng,
            );
            iteration += 1;
        };

        if self.config.sort_result {
            outcome
                .archive
                .sort_by(|a, b| envelope_core::scanning_order(a.fitness(), b.fitness()));
        }

        if self.config.create_front_file {
            write_front_file(
                std::path::Path::new(&self.config.front_file),
                &outcome.archive,
                self.genetics.as_ref(),
                &bbox,
            )?;
        }

        Ok(outcome)
    }

    /// Tops `population` up to `internalPopulationSize` with freshly
    /// initialized individuals, leaving any entries already present
    /// untouched, aborting with `InitStall` if the capability rejects
    /// more than a million candidates in a row. Called with an empty
    /// vector for a fresh start, or with the chromosomes reconstructed
    /// from the log on resume (spec §4.7).
    fn fill_population(&self, mut population: Vec<Chromosome>) -> Result<Vec<Chromosome>> {
        population.truncate(self.config.internal_population_size);
        let mut seed_index = 0u64;
        let mut consecutive_rejections = 0u64;
        while population.len() < self.config.internal_population_size {
            match self.genetics.init_individual(seed_index) {
                Ok(chromosome) => {
                    population.push(chromosome);
                    consecutive_rejections = 0;
                }
                Err(_) => {
                    consecutive_rejections += 1;
                    if consecutive_rejections > MAX_CONSECUTIVE_INIT_REJECTIONS {
                        return Err(EnvelopeError::init_stall(format!(
                            "initializer rejected more than {MAX_CONSECUTIVE_INIT_REJECTIONS} consecutive candidates"
                        )));
                    }
                }
            }
            seed_index += 1;
        }
        Ok(population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envelope_core::dominates;
    use tempfile::tempdir;

    /// Two-objective toy problem: maximize the count of leading `1`
    /// bits against the count of trailing `1` bits, a small stand-in
    /// for a ZDT-style conflicting-objectives benchmark.
    #[derive(Clone)]
    struct Toy {
        len: usize,
    }

    impl Genetics<Vec<bool>> for Toy {
        fn chromosome_size(&self) -> usize {
            self.len
        }

        fn init_individual(&self, seed_index: u64) -> envelope_core::Result<Chromosome> {
            Ok(Chromosome::new((0..self.len).map(|b| (seed_index as usize + b) % 3 == 0).collect()))
        }

        fn evaluate(&self, chromosome: &Chromosome) -> (Fitness, bool) {
            let half = self.len / 2;
            let head = chromosome.bits()[..half].iter().filter(|&&b| b).count() as f64;
            let tail = chromosome.bits()[half..].iter().filter(|&&b| b).count() as f64;
            (Fitness::new(vec![head, tail]), true)
        }

        fn crossover(&self, a: &Chromosome, b: &Chromosome, mutation_rate: f64) -> Chromosome {
            let mut rng = EngineRng::from_entropy();
            let bits: Vec<bool> = (0..self.len)
                .map(|i| if rng.coin_flip() { a.bit(i) } else { b.bit(i) })
                .map(|bit| if rng.bool(mutation_rate) { !bit } else { bit })
                .collect();
            Chromosome::new(bits)
        }

        fn mutate(&self, parent: &Chromosome, mutation_rate: f64) -> Chromosome {
            let mut rng = EngineRng::from_entropy();
            let bits: Vec<bool> = (0..self.len)
                .map(|i| if rng.bool(mutation_rate) { !parent.bit(i) } else { parent.bit(i) })
                .collect();
            Chromosome::new(bits)
        }

        fn chromosome_to_phenotype(&self, chromosome: &Chromosome) -> Vec<bool> {
            chromosome.bits().to_vec()
        }

        fn name(&self) -> &str {
            "toy"
        }
    }

    struct AlwaysFails;
    impl Genetics<()> for AlwaysFails {
        fn chromosome_size(&self) -> usize {
            4
        }
        fn init_individual(&self, _seed_index: u64) -> envelope_core::Result<Chromosome> {
            Ok(Chromosome::zeros(4))
        }
        fn evaluate(&self, _chromosome: &Chromosome) -> (Fitness, bool) {
            (Fitness::worst(2), false)
        }
        fn crossover(&self, a: &Chromosome, _b: &Chromosome, _mutation_rate: f64) -> Chromosome {
            a.clone()
        }
        fn mutate(&self, parent: &Chromosome, _mutation_rate: f64) -> Chromosome {
            parent.clone()
        }
        fn chromosome_to_phenotype(&self, _chromosome: &Chromosome) {}
    }

    fn small_config(dir: &std::path::Path) -> EngineConfig {
        EngineConfig {
            external_population_size: 8,
            internal_population_size: 6,
            fitness_space_dimensionality: 2,
            num_of_iterations: 5,
            number_of_threads: 1,
            log_front: true,
            log_filename: dir.join("pareto.log").to_string_lossy().into_owned(),
            random_seed: Some(7),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.number_of_threads = 0;
        let result = EngineBuilder::<Vec<bool>, Toy>::new(config).genetics(Toy { len: 8 }).build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_requires_genetics() {
        let result = EngineBuilder::<Vec<bool>, Toy>::new(EngineConfig::default()).build();
        assert!(matches!(result, Err(EnvelopeError::GeneticsBindError { .. })));
    }

    #[test]
    fn short_run_completes_with_non_dominated_archive() {
        let dir = tempdir().unwrap();
        let config = small_config(dir.path());
        let engine = EngineBuilder::new(config).genetics(Toy { len: 8 }).build().unwrap();

        let outcome = engine.run(false).unwrap();
        assert_eq!(outcome.status, "completed");
        assert_eq!(outcome.iterations_completed, 5);
        assert!(outcome.error.is_none());
        assert!(!outcome.archive.is_empty());

        for a in &outcome.archive {
            for b in &outcome.archive {
                assert!(!dominates(a.fitness(), b.fitness()) || std::ptr::eq(a, b));
            }
        }
    }

    #[test]
    fn resume_continues_past_recorded_iteration() {
        let dir = tempdir().unwrap();
        let config = small_config(dir.path());
        let engine = EngineBuilder::new(config.clone()).genetics(Toy { len: 8 }).build().unwrap();
        let first = engine.run(false).unwrap();
        assert_eq!(first.status, "completed");

        let mut resumed_config = config;
        resumed_config.num_of_iterations = 8;
        let resumed_engine = EngineBuilder::new(resumed_config).genetics(Toy { len: 8 }).build().unwrap();
        let second = resumed_engine.run(true).unwrap();
        assert_eq!(second.status, "completed");
        assert!(!second.archive.is_empty());
    }

    #[test]
    fn all_evaluations_failing_aborts_with_all_evals_failed() {
        let dir = tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.fitness_space_dimensionality = 2;
        let engine = EngineBuilder::<(), AlwaysFails>::new(config).genetics(AlwaysFails).build().unwrap();

        let outcome = engine.run(false).unwrap();
        assert!(matches!(outcome.error, Some(EnvelopeError::AllEvalsFailed { .. })));
        assert_eq!(outcome.status, "all evaluations failed");
    }

    #[test]
    fn sort_result_orders_archive_by_scanning_order() {
        let dir = tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.sort_result = true;
        let engine = EngineBuilder::new(config).genetics(Toy { len: 8 }).build().unwrap();
        let outcome = engine.run(false).unwrap();

        for window in outcome.archive.windows(2) {
            let ordering = envelope_core::scanning_order(window[0].fitness(), window[1].fitness());
            assert_ne!(ordering, std::cmp::Ordering::Greater);
        }
    }

    #[test]
    fn progress_summary_reports_front_size_and_admissions() {
        let text = progress_summary(4, 10, 7, 2, std::time::Duration::from_secs(5));
        assert!(text.contains("5/10"));
        assert!(text.contains("front size 7"));
        assert!(text.contains("2 new"));
    }

    struct RecordingProgress {
        steps: std::sync::Mutex<Vec<String>>,
        substeps: std::sync::Mutex<usize>,
    }

    impl ProgressListener for RecordingProgress {
        fn step(&self, text: &str) {
            self.steps.lock().unwrap().push(text.to_string());
        }
        fn substep(&self, _level: usize, _text: &str) {
            *self.substeps.lock().unwrap() += 1;
        }
    }

    #[test]
    fn progress_listener_receives_steps_and_substeps() {
        let dir = tempdir().unwrap();
        let config = small_config(dir.path());
        let progress = Arc::new(RecordingProgress {
            steps: std::sync::Mutex::new(Vec::new()),
            substeps: std::sync::Mutex::new(0),
        });
        let engine = EngineBuilder::new(config)
            .genetics(Toy { len: 8 })
            .progress(progress.clone())
            .build()
            .unwrap();

        let outcome = engine.run(false).unwrap();
        assert_eq!(outcome.status, "completed");

        let steps = progress.steps.lock().unwrap();
        assert!(steps.iter().any(|s| s == "evaluate"));
        assert!(steps.iter().any(|s| s == "admit" || s.contains("front size")));
        assert!(*progress.substeps.lock().unwrap() > 0);
    }
}
