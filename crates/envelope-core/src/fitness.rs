use std::fmt;
use std::ops::{Deref, Index};

/// A `D`-dimensional fitness vector. Convention: larger is better in
/// every dimension (spec §3); there is no per-dimension minimize
/// direction to track.
#[derive(Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fitness(Vec<f64>);

impl Fitness {
    pub fn new(values: Vec<f64>) -> Self {
        Fitness(values)
    }

    /// The worst possible fitness: zero in every dimension, per spec
    /// §4.1 ("a failed evaluation yields the worst fitness").
    pub fn worst(dimensionality: usize) -> Self {
        Fitness(vec![0.0; dimensionality])
    }

    pub fn dimensionality(&self) -> usize {
        self.0.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl Deref for Fitness {
    type Target = [f64];
    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl Index<usize> for Fitness {
    type Output = f64;
    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl From<Vec<f64>> for Fitness {
    fn from(values: Vec<f64>) -> Self {
        Fitness(values)
    }
}

impl fmt::Debug for Fitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Lexicographic "scanning order" over fitness coordinates, from the
/// last dimension down to the first, per spec §4.7 / GLOSSARY: `A > B`
/// iff `A[D-1] > B[D-1]`, or equal and `A[D-2] > B[D-2]`, and so on.
pub fn scanning_order(a: &Fitness, b: &Fitness) -> std::cmp::Ordering {
    debug_assert_eq!(a.dimensionality(), b.dimensionality());
    for d in (0..a.dimensionality()).rev() {
        match a[d].partial_cmp(&b[d]) {
            Some(std::cmp::Ordering::Equal) | None => continue,
            Some(order) => return order,
        }
    }
    std::cmp::Ordering::Equal
}
