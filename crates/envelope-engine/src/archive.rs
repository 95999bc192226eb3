use envelope_core::{crowding_distance, dominates, kernel, rank, Chromosome, Fitness, Individual, Score, Sigmas};

/// What happened to one candidate offered to [`Archive::admit_pesa`] or
/// [`Archive::admit_nsga2`], carrying enough to log it either way
/// (spec §4.5/§4.8: admitted individuals are always logged when
/// `logFront` is set; dead ones only when `logAllEvaluations` is set).
pub enum AdmissionOutcome {
    Admitted { fitness: Fitness, chromosome: Chromosome },
    Dead { fitness: Fitness, chromosome: Chromosome },
}

impl AdmissionOutcome {
    pub fn fitness(&self) -> &Fitness {
        match self {
            AdmissionOutcome::Admitted { fitness, .. } => fitness,
            AdmissionOutcome::Dead { fitness, .. } => fitness,
        }
    }

    pub fn chromosome(&self) -> &Chromosome {
        match self {
            AdmissionOutcome::Admitted { chromosome, .. } => chromosome,
            AdmissionOutcome::Dead { chromosome, .. } => chromosome,
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, AdmissionOutcome::Dead { .. })
    }
}

/// The result of admitting one iteration's internal population into
/// the archive: one outcome per candidate in input order, plus the
/// count actually inserted (spec §4.5 "return value of admission").
pub struct AdmissionReport {
    pub outcomes: Vec<AdmissionOutcome>,
    pub inserted: usize,
}

/// The bounded external population E (C5): at most `cap` non-dominated
/// individuals, maintained under a density-aware eviction policy.
#[derive(Debug, Clone)]
pub struct Archive {
    individuals: Vec<Individual>,
    cap: usize,
    next_insertion_index: u64,
}

impl Archive {
    pub fn new(cap: usize) -> Self {
        Archive {
            individuals: Vec::new(),
            cap,
            next_insertion_index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    fn next_index(&mut self) -> u64 {
        let index = self.next_insertion_index;
        self.next_insertion_index += 1;
        index
    }

    /// Stages 1 and 2 of spec §4.5's admission protocol, shared by both
    /// algorithm variants: mutual non-dominance within the batch, then
    /// non-dominance against the current archive. A third, implicit
    /// stage enforces invariant 3 (no duplicate chromosomes in E):
    /// a candidate whose chromosome exactly matches an existing E
    /// member, or an earlier-accepted candidate in the same batch, is
    /// rejected even though it may not be dominated.
    fn select_admissible(&self, candidates: &[(Chromosome, Fitness)]) -> Vec<bool> {
        let n = candidates.len();
        let mut keepable = vec![true; n];

        for i in 0..n {
            for j in 0..n {
                if i != j && dominates(&candidates[j].1, &candidates[i].1) {
                    keepable[i] = false;
                    break;
                }
            }
        }

        for i in 0..n {
            if !keepable[i] {
                continue;
            }
            if self.individuals.iter().any(|e| dominates(e.fitness(), &candidates[i].1)) {
                keepable[i] = false;
            }
        }

        for i in 0..n {
            if !keepable[i] {
                continue;
            }
            if self.individuals.iter().any(|e| e.chromosome() == &candidates[i].0) {
                keepable[i] = false;
                continue;
            }
            for j in 0..i {
                if keepable[j] && candidates[j].0 == candidates[i].0 {
                    keepable[i] = false;
                    break;
                }
            }
        }

        keepable
    }

    /// PESA admission (spec §4.5 with the §4.4 PESA density kernel):
    /// per-candidate incremental insert, each insertion evicting any
    /// archive members the candidate dominates and updating every
    /// remaining score by the kernel contributions gained/lost, then a
    /// single batch-end truncation if the cap was exceeded.
    pub fn admit_pesa(&mut self, candidates: Vec<(Chromosome, Fitness)>, sigmas: &Sigmas) -> AdmissionReport {
        let keepable = self.select_admissible(&candidates);
        let mut outcomes = Vec::with_capacity(candidates.len());
        let mut inserted = 0;

        for (i, (chromosome, fitness)) in candidates.into_iter().enumerate() {
            if keepable[i] {
                outcomes.push(AdmissionOutcome::Admitted {
                    fitness: fitness.clone(),
                    chromosome: chromosome.clone(),
                });
                self.insert_one_pesa(chromosome, fitness, sigmas);
                inserted += 1;
            } else {
                outcomes.push(AdmissionOutcome::Dead { fitness, chromosome });
            }
        }

        if self.individuals.len() > self.cap {
            self.truncate_pesa(sigmas);
        }

        AdmissionReport { outcomes, inserted }
    }

    /// Single-individual PESA insert (spec §4.5 stage 3 / the
    /// original's `PESA::insert(individual&, PE&)`): evict every
    /// archive member the incomer dominates, subtracting each
    /// evicted member's kernel contribution from the rest, then
    /// accumulate the incomer's own score against the survivors while
    /// adding its contribution to theirs.
    fn insert_one_pesa(&mut self, chromosome: Chromosome, fitness: Fitness, sigmas: &Sigmas) {
        let mut to_evict: Vec<usize> = self
            .individuals
            .iter()
            .enumerate()
            .filter(|(_, e)| dominates(&fitness, e.fitness()))
            .map(|(idx, _)| idx)
            .collect();
        to_evict.sort_unstable();

        for &idx in to_evict.iter().rev() {
            let evicted = self.individuals.swap_remove(idx);
            for survivor in self.individuals.iter_mut() {
                let k = kernel(survivor.fitness(), evicted.fitness(), sigmas);
                adjust_density(survivor, -k);
            }
        }

        let mut new_score = 0.0;
        for survivor in self.individuals.iter_mut() {
            let k = kernel(&fitness, survivor.fitness(), sigmas);
            new_score += k;
            adjust_density(survivor, k);
        }

        let index = self.next_index();
        self.individuals
            .push(Individual::new(chromosome, fitness, Score::Density(new_score), index));
    }

    /// Batch-end truncation (spec §4.5 stage 3, last bullet): sort by
    /// `(score, insertion_index)` — the stable tie-break spec §9
    /// requires — and drop everything past the cap, subtracting each
    /// dropped member's kernel contribution from the survivors so the
    /// density-consistency invariant (testable property 3) still
    /// holds afterward.
    fn truncate_pesa(&mut self, sigmas: &Sigmas) {
        self.individuals.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        if self.individuals.len() <= self.cap {
            return;
        }
        let evicted = self.individuals.split_off(self.cap);
        for evicted_ind in &evicted {
            for survivor in self.individuals.iter_mut() {
                let k = kernel(survivor.fitness(), evicted_ind.fitness(), sigmas);
                adjust_density(survivor, -k);
            }
        }
    }

    /// NSGA-II admission: the same stage 1/2 dominance filtering, but
    /// density bookkeeping is the bulk rank/crowding recompute of
    /// spec §4.4's NSGA-II variant rather than PESA's incremental
    /// kernel updates — evicted archive members are simply dropped
    /// and every surviving score is recomputed from the resulting set
    /// (and again after any cap truncation).
    pub fn admit_nsga2(&mut self, candidates: Vec<(Chromosome, Fitness)>) -> AdmissionReport {
        let keepable = self.select_admissible(&candidates);
        let mut outcomes = Vec::with_capacity(candidates.len());
        let mut inserted = 0;

        for (i, (chromosome, fitness)) in candidates.into_iter().enumerate() {
            if keepable[i] {
                outcomes.push(AdmissionOutcome::Admitted {
                    fitness: fitness.clone(),
                    chromosome: chromosome.clone(),
                });
                self.individuals.retain(|e| !dominates(&fitness, e.fitness()));
                let index = self.next_index();
                self.individuals
                    .push(Individual::new(chromosome, fitness, Score::RankCrowd(0, 0.0), index));
                inserted += 1;
            } else {
                outcomes.push(AdmissionOutcome::Dead { fitness, chromosome });
            }
        }

        self.recompute_nsga2_scores();

        if self.individuals.len() > self.cap {
            self.individuals.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
            self.individuals.truncate(self.cap);
            self.recompute_nsga2_scores();
        }

        AdmissionReport { outcomes, inserted }
    }

    /// Recomputes rank (fast non-dominated sort) and crowding distance
    /// for every current archive member from scratch (spec §4.4
    /// NSGA-II variant).
    pub fn recompute_nsga2_scores(&mut self) {
        if self.individuals.is_empty() {
            return;
        }
        let fitnesses: Vec<Fitness> = self.individuals.iter().map(|ind| ind.fitness().clone()).collect();
        let ranks = rank(&fitnesses);
        let distances = crowding_distance(&fitnesses);
        for (ind, (r, d)) in self.individuals.iter_mut().zip(ranks.into_iter().zip(distances)) {
            ind.set_score(Score::RankCrowd(r, d));
        }
    }

    /// Recomputes every PESA density score from scratch against the
    /// current sigmas. Used after a resume, when the archive has been
    /// seeded from the log but no score has ever been assigned, and
    /// whenever [`crate::engine`]'s `update_E` state finds the fitness
    /// box changed (spec §4.7's `update_E` transition: "recompute
    /// sigma, rescore every e in E").
    pub fn rescore_pesa(&mut self, sigmas: &Sigmas) {
        let n = self.individuals.len();
        let mut scores = vec![0.0; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                scores[i] += kernel(self.individuals[i].fitness(), self.individuals[j].fitness(), sigmas);
            }
        }
        for (ind, score) in self.individuals.iter_mut().zip(scores) {
            ind.set_score(Score::Density(score));
        }
    }
}

fn adjust_density(individual: &mut Individual, delta: f64) {
    let current = match individual.score() {
        Score::Density(v) => v,
        Score::RankCrowd(..) => panic!("adjust_density called on a non-PESA score"),
    };
    individual.set_score(Score::Density(current + delta));
}
