//! # Keyword-marker header reader
//!
//! Parses the structured header block of a trajectory file into a
//! [`SystemHeader`]: the ordered list of [`Body`] records plus the declared
//! step count.
//!
//! ## Overview
//! -----------------
//! The header is line-oriented. Five keyword markers may appear in **any file
//! order** (the producing integrator appends `NUM_STEPS` after the tabular
//! block, older variants wrote it up front):
//!
//! - `NUM_BODIES` — the next line is the body count.
//! - `NUM_STEPS` — the next line is the step count.
//! - `NAMES` / `MASSES` / `RADII` — the following `NUM_BODIES` lines are the
//!   per-body values, in body order.
//!
//! Anything else (free-form preamble, blank filler lines, the tabular block
//! itself) is skipped. The source is scanned exactly once.
//!
//! ## Positional correspondence
//! -----------------
//! The `NAMES`, `MASSES` and `RADII` blocks correspond **by position**, not by
//! key. The three lists are therefore zipped into [`Body`] records immediately
//! after the scan, and any length mismatch against `NUM_BODIES` aborts the
//! parse: a partially aligned header would silently attach the wrong mass or
//! radius to a body, which no downstream consumer can detect.
//!
//! ## Error Handling
//! -----------------
//! Failures are wrapped into
//! [`OrreryError::HeaderParsing`](crate::orrery_errors::OrreryError::HeaderParsing)
//! with a [`ParseHeaderError`] payload for precise diagnostics (missing
//! marker, non-numeric field, truncated block).

use log::debug;
use thiserror::Error;

use itertools::izip;

use crate::constants::Bodies;
use crate::orrery_errors::OrreryError;

/// Header-level parsing errors for trajectory files.
///
/// Variants
/// -----------------
/// * `MissingMarker` – A required marker never appears in the file.
/// * `MissingValue` – A marker is the last line of the file.
/// * `InvalidCount` – The line after `NUM_BODIES`/`NUM_STEPS` is not an integer.
/// * `InvalidFloat` – A line inside `MASSES`/`RADII` is not a number.
/// * `TruncatedBlock` – A value block ends before `NUM_BODIES` lines were read.
/// * `AttributeCountMismatch` – The three attribute blocks disagree in length
///   with the declared body count.
/// * `EmptySystem` – The file declares zero bodies or zero steps.
#[derive(Error, Debug, PartialEq)]
pub enum ParseHeaderError {
    #[error("Marker {0} never appears in the file")]
    MissingMarker(&'static str),
    #[error("No value line follows the {0} marker")]
    MissingValue(&'static str),
    #[error("Value {value:?} after {marker} is not an integer")]
    InvalidCount { marker: &'static str, value: String },
    #[error("Value {value:?} in the {marker} block is not a number")]
    InvalidFloat { marker: &'static str, value: String },
    #[error("The {marker} block ends after {got} of {expected} lines")]
    TruncatedBlock {
        marker: &'static str,
        expected: usize,
        got: usize,
    },
    #[error(
        "Header declares {declared} bodies but lists {names} names, {masses} masses, {radii} radii"
    )]
    AttributeCountMismatch {
        declared: usize,
        names: usize,
        masses: usize,
        radii: usize,
    },
    #[error("A system needs at least one body and one step (got {bodies} bodies, {steps} steps)")]
    EmptySystem { bodies: usize, steps: usize },
}

/// One point-mass entity tracked across frames.
///
/// Identity is positional: a body's index in the system order selects its
/// table columns and its renderer color. Built once during the header parse,
/// immutable afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub mass: f64,
    pub radius: f64,
}

/// Parsed header block: the ordered body list and the declared step count.
#[derive(Debug, Clone)]
pub struct SystemHeader {
    pub bodies: Bodies,
    pub number_of_steps: usize,
}

impl SystemHeader {
    pub fn number_of_bodies(&self) -> usize {
        self.bodies.len()
    }
}

/// Consume the next line as an integer value for `marker`.
fn next_count<'a>(
    lines: &mut impl Iterator<Item = &'a str>,
    marker: &'static str,
) -> Result<usize, ParseHeaderError> {
    let value = lines
        .next()
        .ok_or(ParseHeaderError::MissingValue(marker))?
        .trim();
    value
        .parse::<usize>()
        .map_err(|_| ParseHeaderError::InvalidCount {
            marker,
            value: value.to_string(),
        })
}

/// Consume the next `expected` lines as float values for `marker`.
fn next_floats<'a>(
    lines: &mut impl Iterator<Item = &'a str>,
    marker: &'static str,
    expected: usize,
) -> Result<Vec<f64>, ParseHeaderError> {
    let mut values = Vec::with_capacity(expected);
    for got in 0..expected {
        let line = lines
            .next()
            .ok_or(ParseHeaderError::TruncatedBlock {
                marker,
                expected,
                got,
            })?
            .trim();
        values.push(
            line.parse::<f64>()
                .map_err(|_| ParseHeaderError::InvalidFloat {
                    marker,
                    value: line.to_string(),
                })?,
        );
    }
    Ok(values)
}

/// Scan the full file content for the five header markers and build a
/// [`SystemHeader`].
///
/// The scan reads each line once; on a marker match the following line(s) are
/// consumed from the same iterator as the marker's value block, exactly as the
/// producing format lays them out. Data rows of the tabular block never match
/// a marker prefix, so scanning past the table is harmless and lets
/// `NUM_STEPS` live at either end of the file.
///
/// Arguments
/// -----------------
/// * `content` – The whole file as text (already read; no I/O happens here).
///
/// Return
/// ----------
/// * A validated [`SystemHeader`], or an
///   [`OrreryError::HeaderParsing`](crate::orrery_errors::OrreryError::HeaderParsing)
///   describing the first defect found.
pub(crate) fn extract_header(content: &str) -> Result<SystemHeader, OrreryError> {
    let mut number_of_bodies: Option<usize> = None;
    let mut number_of_steps: Option<usize> = None;
    let mut names: Vec<String> = Vec::new();
    let mut masses: Vec<f64> = Vec::new();
    let mut radii: Vec<f64> = Vec::new();

    let mut lines = content.lines();
    while let Some(line) = lines.next() {
        if line.starts_with("NUM_BODIES") {
            number_of_bodies = Some(next_count(&mut lines, "NUM_BODIES")?);
        } else if line.starts_with("NUM_STEPS") {
            number_of_steps = Some(next_count(&mut lines, "NUM_STEPS")?);
        } else if line.starts_with("NAMES") {
            // Bounded read: the block length is whatever NUM_BODIES declared
            // so far. A wrong order is caught by the count check below.
            let expected = number_of_bodies.unwrap_or(0);
            for got in 0..expected {
                let name = lines.next().ok_or(ParseHeaderError::TruncatedBlock {
                    marker: "NAMES",
                    expected,
                    got,
                })?;
                names.push(name.trim().to_string());
            }
        } else if line.starts_with("MASSES") {
            masses.extend(next_floats(
                &mut lines,
                "MASSES",
                number_of_bodies.unwrap_or(0),
            )?);
        } else if line.starts_with("RADII") {
            radii.extend(next_floats(
                &mut lines,
                "RADII",
                number_of_bodies.unwrap_or(0),
            )?);
        }
    }

    let declared = number_of_bodies.ok_or(ParseHeaderError::MissingMarker("NUM_BODIES"))?;
    let number_of_steps = number_of_steps.ok_or(ParseHeaderError::MissingMarker("NUM_STEPS"))?;

    if declared == 0 || number_of_steps == 0 {
        return Err(ParseHeaderError::EmptySystem {
            bodies: declared,
            steps: number_of_steps,
        }
        .into());
    }
    if names.len() != declared || masses.len() != declared || radii.len() != declared {
        return Err(ParseHeaderError::AttributeCountMismatch {
            declared,
            names: names.len(),
            masses: masses.len(),
            radii: radii.len(),
        }
        .into());
    }

    let bodies: Bodies = izip!(names, masses, radii)
        .map(|(name, mass, radius)| Body { name, mass, radius })
        .collect();

    debug!(
        "header: {} bodies, {} steps declared",
        bodies.len(),
        number_of_steps
    );

    Ok(SystemHeader {
        bodies,
        number_of_steps,
    })
}
