use std::fmt::Debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use envelope_core::{FitnessBox, Genetics, Individual};
use envelope_error::{EnvelopeError, Result};

/// Writes the optional final front file (spec §6 "Persisted state"): a
/// sequence of `((fitness-vector), (phenotype-serialization))` pairs,
/// one per archive member, followed by the final [`FitnessBox`].
/// Phenotypes are rendered with their `Debug` impl — the spec leaves
/// the serialization format of the opaque phenotype object
/// unspecified, and `Debug` is the lowest common denominator every
/// `Genetics::chromosome_to_phenotype` output can provide.
pub fn write_front_file<P, G>(path: &Path, archive: &[Individual], genetics: &G, bbox: &FitnessBox) -> Result<()>
where
    P: Debug,
    G: Genetics<P>,
{
    let file = File::create(path)
        .map_err(|e| EnvelopeError::log_read(format!("could not create front file '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    for individual in archive {
        let phenotype = genetics.chromosome_to_phenotype(individual.chromosome());
        let values = individual
            .fitness()
            .values()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(writer, "({values}) ({phenotype:?})")
            .map_err(|e| EnvelopeError::log_read(format!("could not write front file record: {e}")))?;
    }

    write!(writer, "# bounding box:")
        .map_err(|e| EnvelopeError::log_read(format!("could not write front file bounding box: {e}")))?;
    for d in 0..bbox.dimensionality() {
        write!(writer, " [{}, {}]", bbox.min(d), bbox.max(d))
            .map_err(|e| EnvelopeError::log_read(format!("could not write front file bounding box: {e}")))?;
    }
    writeln!(writer).map_err(|e| EnvelopeError::log_read(format!("could not write front file bounding box: {e}")))?;

    writer
        .flush()
        .map_err(|e| EnvelopeError::log_read(format!("could not flush front file: {e}")))
}
