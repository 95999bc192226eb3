use envelope_core::{Chromosome, Fitness};

/// One data-section line: a bracketed `(fitness-vector)` followed by
/// a space and the chromosome's bit string, with an optional trailing
/// ` ;; x` comment marking a dominated-out ("dead") individual when
/// `logAllEvaluations` is enabled (spec §4.8).
pub fn encode_record(fitness: &Fitness, chromosome: &Chromosome, dead: bool) -> String {
    let values = fitness
        .values()
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let mut line = format!("({values}) {}", chromosome.to_bit_string());
    if dead {
        line.push_str(" ;; x");
    }
    line
}

pub struct DecodedRecord {
    pub fitness: Fitness,
    pub chromosome: Chromosome,
    pub dead: bool,
}

/// Parses a line produced by [`encode_record`]. Returns `None` on any
/// malformed input (spec §4.8: "malformed trailing records are
/// dropped").
pub fn decode_record(line: &str) -> Option<DecodedRecord> {
    let line = line.trim();
    if !line.starts_with('(') {
        return None;
    }
    let close = line.find(')')?;
    let inside = &line[1..close];
    let mut values = Vec::new();
    for part in inside.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            return None;
        }
        values.push(trimmed.parse::<f64>().ok()?);
    }

    let rest = line[close + 1..].trim();
    let (bits_part, dead) = match rest.strip_suffix(";; x") {
        Some(prefix) => (prefix.trim(), true),
        None => (rest, false),
    };

    let chromosome = Chromosome::from_bit_string(bits_part)?;
    Some(DecodedRecord {
        fitness: Fitness::new(values),
        chromosome,
        dead,
    })
}

const ITERATION_MARKER_PREFIX: &str = ";; Iteration: ";

/// A `;; Iteration: <n>  Front size: <m>  New individuals: <k>` comment
/// line (spec §4.8).
pub fn encode_iteration_marker(iteration: u64, front_size: usize, new_individuals: usize) -> String {
    format!(
        "{ITERATION_MARKER_PREFIX}{iteration}  Front size: {front_size}  New individuals: {new_individuals}"
    )
}

/// `true` if `line` is an iteration marker comment (used by the
/// resume scan; the inner iteration number is parsed separately by
/// [`crate::resume::find_last_iteration`]).
pub fn is_iteration_marker(line: &str) -> bool {
    line.contains(ITERATION_MARKER_PREFIX)
}

pub(crate) fn iteration_marker_prefix() -> &'static str {
    ITERATION_MARKER_PREFIX
}
