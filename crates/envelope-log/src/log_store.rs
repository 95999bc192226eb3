use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use envelope_core::{Chromosome, Fitness};
use envelope_error::{EnvelopeError, Result};

use crate::format::{self, encode_iteration_marker, encode_record};
use crate::header::{self, Header};
use crate::resume;

/// Appends to the log: writes the header once (on a fresh run) and
/// then one record per admitted individual plus an iteration-marker
/// comment at the end of each iteration (spec §4.8).
pub struct LogWriter {
    file: BufWriter<File>,
}

impl LogWriter {
    /// Starts a brand-new log at `path`, writing `header`
    /// immediately. Overwrites any existing file at `path`.
    pub fn create(path: &Path, header: &Header) -> Result<Self> {
        let file = File::create(path)
            .map_err(|e| EnvelopeError::log_read(format!("could not create log '{}': {e}", path.display())))?;
        let mut writer = BufWriter::new(file);
        header::write_header(&mut writer, header)
            .map_err(|e| EnvelopeError::log_read(format!("could not write log header: {e}")))?;
        writer
            .flush()
            .map_err(|e| EnvelopeError::log_read(format!("could not flush log header: {e}")))?;
        Ok(LogWriter { file: writer })
    }

    /// Opens an existing log at `path` for appending, for continuing
    /// a run after resume. The header is assumed already present.
    pub fn append(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|e| EnvelopeError::log_read(format!("could not open log '{}': {e}", path.display())))?;
        Ok(LogWriter {
            file: BufWriter::new(file),
        })
    }

    pub fn append_record(&mut self, fitness: &Fitness, chromosome: &Chromosome, dead: bool) -> Result<()> {
        writeln!(self.file, "{}", encode_record(fitness, chromosome, dead))
            .map_err(|e| EnvelopeError::log_read(format!("could not append log record: {e}")))
    }

    pub fn append_iteration_marker(&mut self, iteration: u64, front_size: usize, new_individuals: usize) -> Result<()> {
        writeln!(
            self.file,
            "{}",
            encode_iteration_marker(iteration, front_size, new_individuals)
        )
        .map_err(|e| EnvelopeError::log_read(format!("could not append iteration marker: {e}")))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.file
            .flush()
            .map_err(|e| EnvelopeError::log_read(format!("could not flush log: {e}")))
    }
}

/// What a resume reconstructs: the header (restoring configuration
/// and the `Genetics` name/state), the surviving `(fitness,
/// chromosome)` pairs to seed the archive with, and the iteration to
/// resume at (spec §4.7/§4.8).
#[derive(Debug, Clone)]
pub struct ResumeState {
    pub header: Header,
    pub records: Vec<(Fitness, Chromosome)>,
    pub start_iteration: u64,
}

/// Reads `path` for resume: parses the header, streams records in
/// order, drops malformed trailing records and ones whose
/// dimensionality/length disagree with the header, skips records
/// marked dead, and recovers the start iteration via
/// [`resume::find_last_iteration`] (spec §4.8).
pub fn load_for_resume(path: &Path) -> Result<ResumeState> {
    let text = fs::read_to_string(path)
        .map_err(|e| EnvelopeError::log_read(format!("could not read log '{}': {e}", path.display())))?;

    let mut lines = text.lines();
    let header = header::parse_header(&mut lines)?;

    let mut records = Vec::new();
    for line in lines {
        if line.trim().is_empty() || format::is_iteration_marker(line) {
            continue;
        }
        let Some(decoded) = format::decode_record(line) else {
            continue; // malformed trailing record, dropped per spec
        };
        if decoded.dead {
            continue;
        }
        if decoded.fitness.dimensionality() != header.config.fitness_space_dimensionality {
            continue;
        }
        if decoded.chromosome.len() != header.chromosome_length {
            continue;
        }
        records.push((decoded.fitness, decoded.chromosome));
    }

    let start_iteration = resume::find_last_iteration(&text).max(0) as u64;

    Ok(ResumeState {
        header,
        records,
        start_iteration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use envelope_core::EngineConfig;
    use tempfile::tempdir;

    fn sample_header() -> Header {
        Header {
            config: EngineConfig::default(),
            chromosome_length: 8,
            genetics_name: "test-genetics".to_string(),
            genetics_state: None,
        }
    }

    #[test]
    fn write_then_resume_recovers_records_and_iteration() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pareto.log");

        let header = sample_header();
        let mut writer = LogWriter::create(&path, &header).unwrap();
        for i in 0..3u64 {
            let chromosome = Chromosome::new((0..8).map(|b| (i + b) % 2 == 0).collect());
            let fitness = Fitness::new(vec![i as f64, (3 - i) as f64]);
            writer.append_record(&fitness, &chromosome, false).unwrap();
            writer
                .append_iteration_marker(i, (i + 1) as usize, 1)
                .unwrap();
        }
        writer.flush().unwrap();
        drop(writer);

        let resumed = load_for_resume(&path).unwrap();
        assert_eq!(resumed.header.genetics_name, "test-genetics");
        assert_eq!(resumed.records.len(), 3);
        // last=2, count=3 -> max(1,1) = 1
        assert_eq!(resumed.start_iteration, 1);
    }

    #[test]
    fn dead_records_are_not_restored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pareto.log");

        let header = sample_header();
        let mut writer = LogWriter::create(&path, &header).unwrap();
        writer
            .append_record(&Fitness::new(vec![1.0, 1.0]), &Chromosome::zeros(8), true)
            .unwrap();
        writer
            .append_record(&Fitness::new(vec![2.0, 2.0]), &Chromosome::zeros(8), false)
            .unwrap();
        writer.flush().unwrap();
        drop(writer);

        let resumed = load_for_resume(&path).unwrap();
        assert_eq!(resumed.records.len(), 1);
        assert_eq!(resumed.records[0].0.values(), &[2.0, 2.0]);
    }

    #[test]
    fn truncated_trailing_record_is_dropped_not_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pareto.log");

        let header = sample_header();
        let mut writer = LogWriter::create(&path, &header).unwrap();
        writer
            .append_record(&Fitness::new(vec![1.0, 1.0]), &Chromosome::zeros(8), false)
            .unwrap();
        writer.flush().unwrap();
        drop(writer);

        // Simulate a crash mid-write: append a half-written record.
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        write!(file, "(2.0, 3.0) 0101").unwrap(); // no trailing newline / length mismatch

        let resumed = load_for_resume(&path).unwrap();
        assert_eq!(resumed.records.len(), 1);
    }

    #[test]
    fn appending_after_resume_continues_the_same_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pareto.log");

        let header = sample_header();
        let mut writer = LogWriter::create(&path, &header).unwrap();
        writer
            .append_record(&Fitness::new(vec![1.0, 1.0]), &Chromosome::zeros(8), false)
            .unwrap();
        writer.flush().unwrap();
        drop(writer);

        let mut resumed_writer = LogWriter::append(&path).unwrap();
        resumed_writer
            .append_record(&Fitness::new(vec![2.0, 2.0]), &Chromosome::zeros(8), false)
            .unwrap();
        resumed_writer.flush().unwrap();
        drop(resumed_writer);

        let resumed = load_for_resume(&path).unwrap();
        assert_eq!(resumed.records.len(), 2);
    }
}
