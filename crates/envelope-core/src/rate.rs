/// Exponential mutation-rate annealing schedule (spec §4.6):
/// `r(i) = (r0 - r_inf) * exp(-i / decay) + r_inf`.
///
/// A negative `r0`/`r_inf` means "the magnitude divided by the
/// chromosome length `L`" (so `-1.0` means `1/L`), resolved once at
/// construction time against the chromosome length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationSchedule {
    r0: f64,
    r_inf: f64,
    decay: f64,
}

impl MutationSchedule {
    /// `decay` must be strictly positive; the caller validates this
    /// as part of configuration validation (spec §7 `ConfigError`).
    pub fn new(initial_rate: f64, final_rate: f64, decay: f64, chromosome_len: usize) -> Self {
        MutationSchedule {
            r0: resolve_rate(initial_rate, chromosome_len),
            r_inf: resolve_rate(final_rate, chromosome_len),
            decay,
        }
    }

    /// The mutation rate at 0-based iteration `i`.
    pub fn value(&self, iteration: u64) -> f64 {
        (self.r0 - self.r_inf) * (-(iteration as f64) / self.decay).exp() + self.r_inf
    }
}

fn resolve_rate(rate: f64, chromosome_len: usize) -> f64 {
    if rate < 0.0 {
        rate.abs() / chromosome_len as f64
    } else {
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_rate_means_magnitude_over_length() {
        let schedule = MutationSchedule::new(-1.0, -1.0, 10.0, 20);
        // r0 == r_inf == 1/20, so the schedule is constant.
        assert!((schedule.value(0) - 0.05).abs() < 1e-12);
        assert!((schedule.value(100) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn decays_from_r0_toward_r_inf() {
        let schedule = MutationSchedule::new(0.5, 0.01, 33.38, 30);
        let r0 = schedule.value(0);
        let r_later = schedule.value(200);
        assert!((r0 - 0.5).abs() < 1e-9);
        assert!(r_later < r0);
        assert!(r_later > 0.01 - 1e-6);
    }

    #[test]
    fn equal_endpoints_give_constant_schedule() {
        let schedule = MutationSchedule::new(0.2, 0.2, 1.0, 16);
        assert_eq!(schedule.value(0), schedule.value(500));
    }
}
