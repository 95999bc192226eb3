//! The envelope engine's append-only, resumable log store (C8).
//!
//! Layout: a header block (the full [`EngineConfig`] plus the
//! `Genetics` name/state) followed by a data section of one record per
//! admitted individual, interleaved with `;; Iteration: ...` comment
//! markers. See [`log_store`] for the read/write entry points and
//! [`resume`] for the start-iteration recovery rule.

mod format;
mod header;
mod log_store;
mod resume;

pub use format::{decode_record, encode_iteration_marker, encode_record, is_iteration_marker, DecodedRecord};
pub use header::{parse_header, write_header, Header};
pub use log_store::{load_for_resume, LogWriter, ResumeState};
pub use resume::find_last_iteration;

pub use envelope_core::EngineConfig;
