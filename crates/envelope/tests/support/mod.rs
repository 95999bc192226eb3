use envelope::{Chromosome, EngineRng, Fitness, Genetics, Result};

/// A small two-conflicting-objectives problem in the shape of the
/// classic ZDT1 benchmark: maximize the head-bit count while the
/// tail bits pull the second objective the other way, so no single
/// chromosome maximizes both at once.
pub struct Zdt1Like {
    pub len: usize,
}

impl Genetics<Vec<bool>> for Zdt1Like {
    fn chromosome_size(&self) -> usize {
        self.len
    }

    fn init_individual(&self, seed_index: u64) -> Result<Chromosome> {
        let mut rng = EngineRng::from_seed(seed_index.wrapping_mul(2_654_435_761).wrapping_add(1));
        Ok(Chromosome::new((0..self.len).map(|_| rng.coin_flip()).collect()))
    }

    fn evaluate(&self, chromosome: &Chromosome) -> (Fitness, bool) {
        let half = self.len / 2;
        let f1 = chromosome.bits()[..half].iter().filter(|&&b| b).count() as f64;
        let g = 1.0 + chromosome.bits()[half..].iter().filter(|&&b| b).count() as f64;
        // f2 trades off against f1 through g, the way ZDT1's
        // `g * (1 - sqrt(f1/g))` does for a continuous encoding;
        // here it stays in "larger is better" fitness convention.
        let f2 = g * (1.0 - (f1 / (half as f64).max(1.0)).sqrt()).max(0.0) * half as f64;
        (Fitness::new(vec![f1, f2]), true)
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
        "zdt1-like"
    }
}

/// A toy problem whose two objectives are a chromosome's ones-count
/// and zeros-count, which always sum to the chromosome length. No two
/// chromosomes with a different ones-count ever dominate one another,
/// and same-count chromosomes tie exactly rather than dominating —
/// dominance-based rejection never fires, so admission into the
/// archive turns entirely on the duplicate-chromosome check. Useful
/// for isolating behavior that depends on chromosome identity (e.g.
/// whether a candidate was already logged) from density tie-breaks.
pub struct OnesVsZeros {
    pub len: usize,
}

impl Genetics<Vec<bool>> for OnesVsZeros {
    fn chromosome_size(&self) -> usize {
        self.len
    }

    fn init_individual(&self, seed_index: u64) -> Result<Chromosome> {
        let mut rng = EngineRng::from_seed(seed_index.wrapping_mul(2_654_435_761).wrapping_add(7));
        Ok(Chromosome::new((0..self.len).map(|_| rng.coin_flip()).collect()))
    }

    fn evaluate(&self, chromosome: &Chromosome) -> (Fitness, bool) {
        let ones = chromosome.bits().iter().filter(|&&b| b).count() as f64;
        let zeros = self.len as f64 - ones;
        (Fitness::new(vec![ones, zeros]), true)
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
        "ones-vs-zeros"
    }
}

/// Always reports evaluation failure, for exercising the
/// `AllEvalsFailed` escalation path.
pub struct AlwaysFails {
    pub len: usize,
    pub dimensionality: usize,
}

impl Genetics<()> for AlwaysFails {
    fn chromosome_size(&self) -> usize {
        self.len
    }

    fn init_individual(&self, _seed_index: u64) -> Result<Chromosome> {
        Ok(Chromosome::zeros(self.len))
    }

    fn evaluate(&self, _chromosome: &Chromosome) -> (Fitness, bool) {
        (Fitness::worst(self.dimensionality), false)
    }

    fn crossover(&self, a: &Chromosome, _b: &Chromosome, _mutation_rate: f64) -> Chromosome {
        a.clone()
    }

    fn mutate(&self, parent: &Chromosome, _mutation_rate: f64) -> Chromosome {
        parent.clone()
    }

    fn chromosome_to_phenotype(&self, _chromosome: &Chromosome) {}
}

/// Reports the same fitness vector for every chromosome, so mutual
/// dominance never rejects a candidate and only density eviction
/// keeps the archive bounded.
pub struct ConstantFitness {
    pub len: usize,
    pub fitness: Vec<f64>,
}

impl Genetics<()> for ConstantFitness {
    fn chromosome_size(&self) -> usize {
        self.len
    }

    fn init_individual(&self, seed_index: u64) -> Result<Chromosome> {
        let mut rng = EngineRng::from_seed(seed_index.wrapping_add(1));
        Ok(Chromosome::new((0..self.len).map(|_| rng.coin_flip()).collect()))
    }

    fn evaluate(&self, _chromosome: &Chromosome) -> (Fitness, bool) {
        (Fitness::new(self.fitness.clone()), true)
    }

    fn crossover(&self, a: &Chromosome, _b: &Chromosome, _mutation_rate: f64) -> Chromosome {
        let mut rng = EngineRng::from_entropy();
        Chromosome::new((0..self.len).map(|i| if rng.coin_flip() { a.bit(i) } else { !a.bit(i) }).collect())
    }

    fn mutate(&self, parent: &Chromosome, mutation_rate: f64) -> Chromosome {
        let mut rng = EngineRng::from_entropy();
        Chromosome::new((0..self.len).map(|i| if rng.bool(mutation_rate) { !parent.bit(i) } else { parent.bit(i) }).collect())
    }

    fn chromosome_to_phenotype(&self, _chromosome: &Chromosome) {}
}
