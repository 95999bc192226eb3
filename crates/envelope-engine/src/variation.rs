use envelope_core::{Chromosome, EngineRng, Genetics, Individual, MutationSchedule, Score};

/// Compares two archive scores under the running algorithm's own
/// convention (spec §4.6): PESA's density is lower-is-better, NSGA-II's
/// `(rank, crowding)` pair is compared lexicographically. `true` means
/// `a` wins the tournament outright.
fn wins(a: &Score, b: &Score) -> bool {
    a.better_than(b)
}

/// Binary tournament selection (spec §4.6): draw two distinct indices,
/// keep the one with the better score, break exact ties with a fair
/// coin. With zero or one archive members, there is nothing to draw
/// from two positions, so the only (or no) index is returned directly.
pub fn tournament(archive: &[Individual], rng: &mut EngineRng) -> Option<usize> {
    match archive.len() {
        0 => None,
        1 => Some(0),
        _ => {
            let (a, b) = rng.distinct_pair(archive.len());
            let score_a = archive[a].score();
            let score_b = archive[b].score();
            if wins(&score_a, &score_b) {
                Some(a)
            } else if wins(&score_b, &score_a) {
                Some(b)
            } else if rng.coin_flip() {
                Some(a)
            } else {
                Some(b)
            }
        }
    }
}

/// Produces exactly `count` children for the next internal population
/// (spec §4.6): each child comes from either crossover of two distinct
/// tournament winners (probability `crossover_probability`, and only
/// when the archive has at least two members) or mutation of a single
/// tournament winner.
pub fn produce_children<P, G: Genetics<P>>(
    archive: &[Individual],
    genetics: &G,
    count: usize,
    crossover_probability: f64,
    mutation_rate: f64,
    rng: &mut EngineRng,
) -> Vec<Chromosome> {
    let mut children = Vec::with_capacity(count);
    for _ in 0..count {
        let child = if archive.len() >= 2 && rng.bool(crossover_probability) {
            let a = tournament(archive, rng).expect("archive has >= 2 members");
            let mut b = tournament(archive, rng).expect("archive has >= 2 members");
            // spec §4.6: "two distinct tournament winners a != b".
            let mut guard = 0;
            while b == a && guard < 64 {
                b = tournament(archive, rng).expect("archive has >= 2 members");
                guard += 1;
            }
            genetics.crossover(archive[a].chromosome(), archive[b].chromosome(), mutation_rate)
        } else {
            let a = tournament(archive, rng).expect("archive is non-empty when producing children");
            genetics.mutate(archive[a].chromosome(), mutation_rate)
        };
        children.push(child);
    }
    children
}

/// Resolves the mutation rate for 0-based iteration `i` from the
/// configured schedule (spec §4.6's annealing formula, implemented in
/// [`envelope_core::MutationSchedule`]).
pub fn mutation_rate_at(schedule: &MutationSchedule, iteration: u64) -> f64 {
    schedule.value(iteration)
}
