use crate::dominance::dominates;
use crate::fitness::Fitness;
use std::sync::OnceLock;

const LUT_SUPPORT: f64 = 3.0;
const LUT_SAMPLES_PER_UNIT: usize = 1024;
const LUT_LEN: usize = (LUT_SUPPORT as usize) * LUT_SAMPLES_PER_UNIT;

/// Build-once, immutable lookup table for `g(x) = exp(-x^2/2)` over
/// `x in [0, 3)`, shared by every thread (C4 implementation note).
struct GaussianLut {
    table: Vec<f64>,
}

impl GaussianLut {
    fn build() -> Self {
        let table = (0..LUT_LEN)
            .map(|i| {
                let x = i as f64 / LUT_SAMPLES_PER_UNIT as f64;
                (-x * x / 2.0).exp()
            })
            .collect();
        GaussianLut { table }
    }

    fn g(&self, x: f64) -> f64 {
        let ax = x.abs();
        if ax >= LUT_SUPPORT {
            return 0.0;
        }
        let idx = (ax * LUT_SAMPLES_PER_UNIT as f64) as usize;
        self.table[idx.min(LUT_LEN - 1)]
    }
}

static LUT: OnceLock<GaussianLut> = OnceLock::new();

fn lut() -> &'static GaussianLut {
    LUT.get_or_init(GaussianLut::build)
}

/// `g(x) = exp(-x^2/2)`, evaluated via the shared lookup table.
/// `|x| >= 3` yields zero.
pub fn gaussian(x: f64) -> f64 {
    lut().g(x)
}

/// Per-dimension `[min, max]` running envelope of every fitness value
/// observed so far.
#[derive(Debug, Clone)]
pub struct FitnessBox {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl FitnessBox {
    pub fn new(dimensionality: usize) -> Self {
        FitnessBox {
            min: vec![f64::INFINITY; dimensionality],
            max: vec![f64::NEG_INFINITY; dimensionality],
        }
    }

    pub fn dimensionality(&self) -> usize {
        self.min.len()
    }

    /// Extends the box to cover `fitness`. Returns `true` if the box
    /// changed.
    pub fn extend(&mut self, fitness: &Fitness) -> bool {
        let mut changed = false;
        for d in 0..fitness.dimensionality() {
            if fitness[d] < self.min[d] {
                self.min[d] = fitness[d];
                changed = true;
            }
            if fitness[d] > self.max[d] {
                self.max[d] = fitness[d];
                changed = true;
            }
        }
        changed
    }

    pub fn contains(&self, fitness: &Fitness) -> bool {
        (0..fitness.dimensionality()).all(|d| fitness[d] >= self.min[d] && fitness[d] <= self.max[d])
    }

    pub fn range(&self, d: usize) -> f64 {
        self.max[d] - self.min[d]
    }

    pub fn min(&self, d: usize) -> f64 {
        self.min[d]
    }

    pub fn max(&self, d: usize) -> f64 {
        self.max[d]
    }
}

/// Per-dimension standard deviations of the density kernel, derived
/// from a [`FitnessBox`] as `range[d] / fitnessSpacePartition / 6`
/// (spec §3 — "divide by 6" so the kernel support matches one
/// partition cell).
#[derive(Debug, Clone)]
pub struct Sigmas(Vec<f64>);

impl Sigmas {
    pub fn recompute(bbox: &FitnessBox, fitness_space_partition: f64) -> Self {
        let sigmas = (0..bbox.dimensionality())
            .map(|d| {
                let range = bbox.range(d);
                if range > 0.0 {
                    range / fitness_space_partition / 6.0
                } else {
                    // A degenerate (single-valued) dimension would
                    // otherwise divide by zero; treat it as having no
                    // spread, so the kernel factor for that dimension
                    // is always 1 (every observed value is identical).
                    f64::INFINITY
                }
            })
            .collect();
        Sigmas(sigmas)
    }

    pub fn get(&self, d: usize) -> f64 {
        self.0[d]
    }
}

/// The Gaussian kernel between two fitnesses, the product over
/// dimensions of `g((a[d]-b[d])/sigma[d])`, short-circuiting to zero
/// as soon as one factor is zero (spec §4.4).
pub fn kernel(a: &Fitness, b: &Fitness, sigmas: &Sigmas) -> f64 {
    let mut product = 1.0;
    for d in 0..a.dimensionality() {
        let sigma = sigmas.get(d);
        let x = if sigma.is_finite() {
            (a[d] - b[d]) / sigma
        } else {
            0.0
        };
        let factor = gaussian(x);
        if factor == 0.0 {
            return 0.0;
        }
        product *= factor;
    }
    product
}

/// NSGA-II fast non-dominated sort: rank 1 is the current Pareto
/// front, rank 2 is the front after removing rank 1, and so on.
/// Returned ranks are 0-based (front index).
pub fn rank(fitnesses: &[Fitness]) -> Vec<usize> {
    let n = fitnesses.len();
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut domination_count = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            if dominates(&fitnesses[i], &fitnesses[j]) {
                dominated_by[i].push(j);
                domination_count[j] += 1;
            } else if dominates(&fitnesses[j], &fitnesses[i]) {
                dominated_by[j].push(i);
                domination_count[i] += 1;
            }
        }
    }

    let mut ranks = vec![0usize; n];
    let mut remaining = domination_count;
    let mut front: Vec<usize> = (0..n).filter(|&i| remaining[i] == 0).collect();
    let mut front_index = 0;

    while !front.is_empty() {
        let mut next_front = Vec::new();
        for &i in &front {
            ranks[i] = front_index;
            for &j in &dominated_by[i] {
                remaining[j] -= 1;
                if remaining[j] == 0 {
                    next_front.push(j);
                }
            }
        }
        front_index += 1;
        front = next_front;
    }

    ranks
}

/// NSGA-II crowding distance: for each objective, sort by that
/// objective, give the two endpoints infinite distance, and give
/// interior members the normalized gap between their neighbors,
/// summed across objectives (spec §4.4).
pub fn crowding_distance(fitnesses: &[Fitness]) -> Vec<f32> {
    let n = fitnesses.len();
    let mut distances = vec![0.0f32; n];
    if n == 0 {
        return distances;
    }
    let dimensionality = fitnesses[0].dimensionality();

    for d in 0..dimensionality {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| fitnesses[a][d].partial_cmp(&fitnesses[b][d]).unwrap());

        distances[order[0]] = f32::INFINITY;
        distances[order[n - 1]] = f32::INFINITY;

        if n <= 2 {
            continue;
        }

        let min_v = fitnesses[order[0]][d];
        let max_v = fitnesses[order[n - 1]][d];
        let range = max_v - min_v;
        if range <= 0.0 {
            continue;
        }

        for k in 1..(n - 1) {
            if !distances[order[k]].is_finite() {
                continue;
            }
            let prev = fitnesses[order[k - 1]][d];
            let next = fitnesses[order[k + 1]][d];
            distances[order[k]] += ((next - prev).abs() / range) as f32;
        }
    }

    distances
}
