use crate::format::iteration_marker_prefix;

/// Recovers the iteration number a resumed run should start at, by
/// scanning every `;; Iteration: <n>` comment line in the log.
///
/// This deliberately reproduces the original engine's off-by-one
/// quirk (spec §9, `ltiParetoFront.cpp::findLastIter`): the result is
/// `max(last_recorded - 1, marker_count - 2)`, not simply
/// `last_recorded`, so the engine re-executes the last partial
/// iteration rather than assuming it completed. Do not "fix" this —
/// it is a documented, intentional property of resume, not a latent
/// bug.
///
/// The result can be negative for very short logs (e.g. a log with
/// zero or one iteration markers); callers clamp it to zero before
/// using it as an iteration counter.
pub fn find_last_iteration(log_text: &str) -> i64 {
    let prefix = iteration_marker_prefix();
    let mut last: i64 = 0;
    let mut count: i64 = 0;

    for line in log_text.lines() {
        if let Some(pos) = line.find(prefix) {
            count += 1;
            let rest = &line[pos + prefix.len()..];
            if let Some(tmp) = rest
                .split_whitespace()
                .next()
                .and_then(|token| token.parse::<i64>().ok())
            {
                if tmp > last {
                    last = tmp;
                }
            }
        }
    }

    std::cmp::max(last - 1, count - 2)
}
