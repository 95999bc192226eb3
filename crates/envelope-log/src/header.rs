use std::collections::HashMap;
use std::io::{self, Write};

use envelope_core::{Algorithm, EngineConfig};
use envelope_error::{EnvelopeError, Result};

/// The log's header block: the full configuration that produced the
/// run, the Genetics capability's reported chromosome length, and its
/// name/optional serialized state (spec §4.8 — "a serialized
/// configuration block containing all engine parameters and the
/// Genetics name + its own serialized state").
///
/// The concrete layout (flat `key = value` lines) is an Open Question
/// resolution recorded in DESIGN.md; spec.md leaves the exact wire
/// format unspecified.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub config: EngineConfig,
    pub chromosome_length: usize,
    pub genetics_name: String,
    pub genetics_state: Option<String>,
}

pub(crate) const DATA_MARKER: &str = ";; -- data --";
const GENETICS_PREFIX: &str = ";; genetics: ";
const GENETICS_STATE_PREFIX: &str = ";; genetics-state: ";

pub fn write_header<W: Write>(w: &mut W, header: &Header) -> io::Result<()> {
    let c = &header.config;
    writeln!(w, "# crossover_probability = {}", c.crossover_probability)?;
    writeln!(w, "# initial_mutation_rate = {}", c.initial_mutation_rate)?;
    writeln!(w, "# final_mutation_rate = {}", c.final_mutation_rate)?;
    writeln!(w, "# mutation_decay_rate = {}", c.mutation_decay_rate)?;
    writeln!(w, "# external_population_size = {}", c.external_population_size)?;
    writeln!(w, "# internal_population_size = {}", c.internal_population_size)?;
    writeln!(
        w,
        "# fitness_space_dimensionality = {}",
        c.fitness_space_dimensionality
    )?;
    writeln!(w, "# num_of_iterations = {}", c.num_of_iterations)?;
    writeln!(w, "# log_all_evaluations = {}", c.log_all_evaluations)?;
    writeln!(w, "# fitness_space_partition = {}", c.fitness_space_partition)?;
    writeln!(w, "# sort_result = {}", c.sort_result)?;
    writeln!(w, "# number_of_threads = {}", c.number_of_threads)?;
    writeln!(w, "# log_front = {}", c.log_front)?;
    writeln!(w, "# log_filename = {}", c.log_filename)?;
    writeln!(w, "# create_front_file = {}", c.create_front_file)?;
    writeln!(w, "# front_file = {}", c.front_file)?;
    writeln!(w, "# algorithm = {}", c.algorithm.name())?;
    writeln!(w, "# chromosome_length = {}", header.chromosome_length)?;
    writeln!(w, "{GENETICS_PREFIX}{}", header.genetics_name)?;
    if let Some(state) = &header.genetics_state {
        writeln!(w, "{GENETICS_STATE_PREFIX}{state}")?;
    }
    writeln!(w, "{DATA_MARKER}")?;
    Ok(())
}

/// Parses a header from `lines`, consuming up to and including the
/// `;; -- data --` marker. Returns the parsed header and the number
/// of lines consumed.
pub fn parse_header<'a, I: Iterator<Item = &'a str>>(lines: &mut I) -> Result<Header> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut genetics_name: Option<String> = None;
    let mut genetics_state: Option<String> = None;

    loop {
        let line = lines
            .next()
            .ok_or_else(|| EnvelopeError::log_read("log ended before the header's data marker"))?;
        let line = line.trim();

        if line == DATA_MARKER {
            break;
        } else if let Some(rest) = line.strip_prefix(GENETICS_STATE_PREFIX) {
            genetics_state = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix(GENETICS_PREFIX) {
            genetics_name = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix('#') {
            if let Some((key, value)) = rest.split_once('=') {
                fields.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        // blank lines and anything else in the header are ignored.
    }

    let genetics_name =
        genetics_name.ok_or_else(|| EnvelopeError::log_read("log header is missing a genetics name"))?;

    let chromosome_length = parse_field::<usize>(&fields, "chromosome_length")?;
    let config = EngineConfig {
        crossover_probability: parse_field(&fields, "crossover_probability")?,
        initial_mutation_rate: parse_field(&fields, "initial_mutation_rate")?,
        final_mutation_rate: parse_field(&fields, "final_mutation_rate")?,
        mutation_decay_rate: parse_field(&fields, "mutation_decay_rate")?,
        external_population_size: parse_field(&fields, "external_population_size")?,
        internal_population_size: parse_field(&fields, "internal_population_size")?,
        fitness_space_dimensionality: parse_field(&fields, "fitness_space_dimensionality")?,
        num_of_iterations: parse_field(&fields, "num_of_iterations")?,
        log_all_evaluations: parse_field(&fields, "log_all_evaluations")?,
        fitness_space_partition: parse_field(&fields, "fitness_space_partition")?,
        sort_result: parse_field(&fields, "sort_result")?,
        number_of_threads: parse_field(&fields, "number_of_threads")?,
        log_front: parse_field(&fields, "log_front")?,
        log_filename: get_field(&fields, "log_filename")?,
        create_front_file: parse_field(&fields, "create_front_file")?,
        front_file: get_field(&fields, "front_file")?,
        algorithm: parse_algorithm(&get_field(&fields, "algorithm")?)?,
        random_seed: None,
    };

    Ok(Header {
        config,
        chromosome_length,
        genetics_name,
        genetics_state,
    })
}

fn get_field(fields: &HashMap<String, String>, key: &str) -> Result<String> {
    fields
        .get(key)
        .cloned()
        .ok_or_else(|| EnvelopeError::log_read(format!("log header is missing field '{key}'")))
}

fn parse_field<T: std::str::FromStr>(fields: &HashMap<String, String>, key: &str) -> Result<T> {
    let raw = get_field(fields, key)?;
    raw.parse()
        .map_err(|_| EnvelopeError::log_read(format!("log header field '{key}' has an invalid value")))
}

fn parse_algorithm(raw: &str) -> Result<Algorithm> {
    match raw {
        "PESA" => Ok(Algorithm::Pesa),
        "NSGA2" => Ok(Algorithm::Nsga2),
        other => Err(EnvelopeError::log_read(format!(
            "log header names unknown algorithm '{other}'"
        ))),
    }
}
