use crate::chromosome::Chromosome;
use crate::fitness::Fitness;

/// The scalar (or lexicographic pair) that drives eviction and
/// tournament selection, per spec §3. PESA uses a density score
/// (lower is better); NSGA-II uses `(rank, crowding distance)`
/// compared lexicographically (lower rank first, then higher
/// crowding distance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    /// PESA's squeeze factor: sum of Gaussian kernel contributions
    /// against every other archive member. Lower is better.
    Density(f64),
    /// NSGA-II's `(rank, crowding distance)`. Lower rank is better;
    /// within a rank, higher crowding distance is better.
    RankCrowd(usize, f32),
}

impl Score {
    /// `true` if `self` is strictly better than `other` under this
    /// score's own convention.
    pub fn better_than(&self, other: &Score) -> bool {
        match (self, other) {
            (Score::Density(a), Score::Density(b)) => a < b,
            (Score::RankCrowd(ra, ca), Score::RankCrowd(rb, cb)) => {
                ra < rb || (ra == rb && ca > cb)
            }
            _ => panic!("Score variants must not be mixed within a single run"),
        }
    }
}

/// An aggregate of {chromosome, fitness, score}, plus the insertion
/// index used as a stable tie-breaker (spec §9's "strict-weak-order"
/// requirement on the density comparator).
#[derive(Debug, Clone)]
pub struct Individual {
    chromosome: Chromosome,
    fitness: Fitness,
    score: Score,
    /// Monotonically increasing id assigned at creation time, used
    /// only to break exact ties in score comparisons deterministically.
    insertion_index: u64,
}

impl Individual {
    pub fn new(chromosome: Chromosome, fitness: Fitness, score: Score, insertion_index: u64) -> Self {
        Individual {
            chromosome,
            fitness,
            score,
            insertion_index,
        }
    }

    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    pub fn fitness(&self) -> &Fitness {
        &self.fitness
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn set_score(&mut self, score: Score) {
        self.score = score;
    }

    pub fn insertion_index(&self) -> u64 {
        self.insertion_index
    }

    /// `(score, insertion_index)` ordering key used when partially
    /// sorting the archive for truncation: stable under ties, per
    /// spec §9.
    pub fn sort_key(&self) -> (OrderedScore, u64) {
        (OrderedScore(self.score), self.insertion_index)
    }
}

/// Wraps [`Score`] with a total order for use as a sort key. PESA's
/// `Density` is never NaN in practice (kernel sums of finite values),
/// so ties in the partial order are resolved as equal rather than
/// panicking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedScore(pub Score);

impl Eq for OrderedScore {}

impl PartialOrd for OrderedScore {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedScore {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self.0, other.0) {
            (Score::Density(a), Score::Density(b)) => {
                a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
            }
            (Score::RankCrowd(ra, ca), Score::RankCrowd(rb, cb)) => ra
                .cmp(&rb)
                .then_with(|| cb.partial_cmp(&ca).unwrap_or(std::cmp::Ordering::Equal)),
            _ => panic!("Score variants must not be mixed within a single run"),
        }
    }
}
