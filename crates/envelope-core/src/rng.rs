use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// The evolution loop's own RNG. Unlike the donor workspace's global/
/// thread-local `random_provider`, this is a plain owned field on the
/// loop's state (spec §5: "the RNG is owned by the evolution-loop
/// thread. Workers must not draw random numbers from it.").
#[derive(Debug, Clone)]
pub struct EngineRng {
    rng: SmallRng,
}

impl EngineRng {
    pub fn from_seed(seed: u64) -> Self {
        EngineRng {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        EngineRng {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// `true` with probability `p`, clamped to `[0, 1]`.
    pub fn bool(&mut self, p: f64) -> bool {
        self.rng.random_bool(p.clamp(0.0, 1.0))
    }

    /// Fair coin flip, used to break tournament ties (spec §4.6).
    pub fn coin_flip(&mut self) -> bool {
        self.bool(0.5)
    }

    /// A uniformly random index in `0..len`.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    /// Two distinct uniformly random indices in `0..len`. `len` must
    /// be at least 2.
    pub fn distinct_pair(&mut self, len: usize) -> (usize, usize) {
        debug_assert!(len >= 2);
        let a = self.index(len);
        loop {
            let b = self.index(len);
            if b != a {
                return (a, b);
            }
        }
    }

    pub fn unit_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}
