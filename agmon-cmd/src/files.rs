//! Reading payloads and opening outputs.
//!
//! Inputs are JSON payloads as written by the fetch layer, optionally
//! gzip-compressed (`.gz`). A path of `-` reads stdin; a missing output
//! path writes to stdout.

use agmon_core::{CoreError, MissingDataError, NdviPayload};
use anyhow::Context;
use flate2::read::GzDecoder;
use log::info;
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

/// Path that selects stdin.
pub const STDIN_PATH: &str = "-";

/// A parsed payload, or the reason it cannot be analyzed.
pub type PayloadInput = Result<NdviPayload, MissingDataError>;

/// Open an input path for reading, decompressing `.gz` files.
pub fn open_input(path: &str) -> anyhow::Result<Box<dyn Read>> {
    if path == STDIN_PATH {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
    let reader = BufReader::new(file);
    let is_gzip = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if is_gzip {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Parse a payload from a reader.
///
/// Payloads whose `results` is not an array come back as
/// `Ok(Err(MissingDataError::ResultsNotArray))` so callers can render an
/// empty state; malformed JSON is an error.
pub fn read_payload<R: Read>(reader: R) -> anyhow::Result<PayloadInput> {
    match NdviPayload::from_reader(reader) {
        Ok(payload) => Ok(Ok(payload)),
        Err(CoreError::MissingData(reason)) => Ok(Err(reason)),
        Err(e) => Err(e).context("Failed to parse observation payload"),
    }
}

/// Load a payload from a path (see [`open_input`]).
pub fn load_payload(path: &str) -> anyhow::Result<PayloadInput> {
    let reader = open_input(path)?;
    let payload = read_payload(reader).with_context(|| format!("Failed to load {path}"))?;
    if let Ok(p) = &payload {
        info!(
            "Loaded {} observations and {} alerts from {}",
            p.results.as_ref().map_or(0, Vec::len),
            p.alerts().len(),
            path
        );
    }
    Ok(payload)
}

/// Open an output file, or stdout when no path is given.
pub fn open_output(path: Option<&str>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        Some(STDIN_PATH) => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        Some(p) => {
            let file = File::create(p).with_context(|| format!("Failed to create {p}"))?;
            Ok(Box::new(BufWriter::new(file)))
        }
    }
}
