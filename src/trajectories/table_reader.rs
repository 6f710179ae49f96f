//! # Tabular block reader
//!
//! Loads the CSV block of a trajectory file into a [`TrajectoryTable`]: a
//! column-addressable, frame-indexed store of per-body coordinates.
//!
//! ## Overview
//! -----------------
//! The tabular block starts with a header row naming one step column followed
//! by six columns per body (`<name>x,<name>y,<name>z,<name>vx,<name>vy,<name>vz`)
//! and ends each row with a trailing separator, which the CSV layer sees as an
//! extra unnamed field (the *artifact column*). Only the `D` coordinate
//! columns per body survive the load; step, velocity and artifact columns are
//! dropped here and never reach downstream consumers. The step column values
//! are kept aside as a `time_list` for display labeling.
//!
//! ## Locating the block
//! -----------------
//! Source variants disagree on how many filler lines precede the header row
//! (`3*N+10` vs `3*N+13`), so no arithmetic offset is trusted. Either the
//! caller forces an explicit line offset, or the reader scans forward for the
//! first line naming the first body's `x` column.
//!
//! ## Lookup contract
//! -----------------
//! * [`TrajectoryTable::coord`] – single coordinate, `O(1)`.
//! * [`TrajectoryTable::point`] – position vector at a frame.
//! * [`TrajectoryTable::axis_prefix`] – contiguous slice of one body's axis
//!   values for frames `[0, up_to]`, backing trail polylines.
//!
//! Frame indices are dense, zero-based and strictly increasing in file row
//! order; trajectories are inherently ordered in time and are never reordered.

use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use nalgebra::SVector;

use crate::constants::{ColumnIndex, Frame, AXIS_SUFFIXES};
use crate::orrery_errors::OrreryError;
use crate::trajectories::header_reader::SystemHeader;

/// Frame-indexed coordinate store for `D`-axis trajectories (`D` = 2 or 3).
///
/// Columns are body-major: body `b`, axis `a` lives at slot `b * D + a`.
/// All column vectors have exactly `number_of_steps` entries.
#[derive(Debug, Clone)]
pub struct TrajectoryTable<const D: usize> {
    columns: Vec<Vec<f64>>,
    time_list: Vec<f64>,
    number_of_steps: usize,
}

impl<const D: usize> TrajectoryTable<D> {
    pub fn number_of_steps(&self) -> usize {
        self.number_of_steps
    }

    /// Single coordinate of `body` at `frame` along `axis`, `O(1)`.
    ///
    /// Indices are not range-checked here; the playback layer validates frames
    /// before querying.
    #[inline]
    pub fn coord(&self, body: usize, frame: Frame, axis: usize) -> f64 {
        self.columns[body * D + axis][frame]
    }

    /// Position of `body` at `frame` as a fixed-size vector.
    #[inline]
    pub fn point(&self, body: usize, frame: Frame) -> SVector<f64, D> {
        SVector::from_fn(|axis, _| self.coord(body, frame, axis))
    }

    /// Contiguous prefix of one body's axis values for frames `[0, up_to]`.
    #[inline]
    pub fn axis_prefix(&self, body: usize, axis: usize, up_to: Frame) -> &[f64] {
        &self.columns[body * D + axis][..=up_to]
    }

    /// Step/time column value at `frame`, for display labeling.
    #[inline]
    pub fn time_at(&self, frame: Frame) -> f64 {
        self.time_list[frame]
    }

    pub fn time_list(&self) -> &[f64] {
        &self.time_list
    }
}

/// Byte offset of the start of line `line_idx` (zero-based), if the content
/// has that many lines.
fn line_start_offset(content: &str, line_idx: usize) -> Option<usize> {
    if line_idx == 0 {
        return Some(0);
    }
    let mut seen = 0;
    for (pos, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            seen += 1;
            if seen == line_idx {
                return Some(pos + 1);
            }
        }
    }
    None
}

/// Find the byte offset of the tabular header row.
///
/// With `table_offset` set, that many leading lines are skipped, mirroring the
/// fixed `skiprows` of older loaders. Otherwise the first line naming the
/// first body's `x` column is taken as the header row.
fn locate_table(
    content: &str,
    first_body: &str,
    table_offset: Option<usize>,
) -> Result<usize, OrreryError> {
    let needle = format!("{first_body}{}", AXIS_SUFFIXES[0]);
    if let Some(skip) = table_offset {
        return line_start_offset(content, skip).ok_or(OrreryError::TableStartNotFound(needle));
    }

    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.contains(&needle) {
            return Ok(offset);
        }
        offset += line.len();
    }
    Err(OrreryError::TableStartNotFound(needle))
}

fn parse_field(
    record: &StringRecord,
    idx: usize,
    row: usize,
    column: &str,
) -> Result<f64, OrreryError> {
    let raw = record.get(idx).ok_or_else(|| OrreryError::MalformedRow {
        row,
        column: column.to_string(),
        value: "<missing>".to_string(),
    })?;
    raw.parse::<f64>().map_err(|_| OrreryError::MalformedRow {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Load the tabular block described by `header` from the file content.
///
/// Arguments
/// -----------------
/// * `content` – The whole file as text.
/// * `header` – Parsed header block (body names size the column set, the
///   declared step count bounds the read).
/// * `table_offset` – Explicit line count to skip before the header row, or
///   `None` to auto-detect.
///
/// Return
/// ----------
/// * A [`TrajectoryTable`] holding exactly `number_of_steps` rows, or the
///   first defect found: a missing `<name>x`/`<name>y`[/`<name>z`] column, a
///   non-numeric cell, or fewer data rows than declared steps. Rows past the
///   declared step count are ignored, as is any trailer the integrator
///   appends after the table.
pub(crate) fn extract_table<const D: usize>(
    content: &str,
    header: &SystemHeader,
    table_offset: Option<usize>,
) -> Result<TrajectoryTable<D>, OrreryError> {
    if D < 2 || D > 3 {
        return Err(OrreryError::UnsupportedDimension(D));
    }

    let steps = header.number_of_steps;
    let n = header.number_of_bodies();

    let start = locate_table(content, &header.bodies[0].name, table_offset)?;
    debug!("tabular header row found at byte offset {start}");

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content[start..].as_bytes());

    // Column name -> index, skipping the unnamed artifact field the trailing
    // separator produces.
    let header_row = reader.headers()?.clone();
    let column_index: ColumnIndex = header_row
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .map(|(idx, name)| (name.to_string(), idx))
        .collect();

    let mut wanted: Vec<(String, usize)> = Vec::with_capacity(n * D);
    for body in &header.bodies {
        for suffix in AXIS_SUFFIXES.iter().take(D) {
            let name = format!("{}{suffix}", body.name);
            let idx = *column_index
                .get(&name)
                .ok_or_else(|| OrreryError::MissingColumn(name.clone()))?;
            wanted.push((name, idx));
        }
    }
    debug!(
        "keeping {} coordinate columns of {}, plus step column {:?}",
        wanted.len(),
        column_index.len(),
        header_row.get(0).unwrap_or("")
    );

    let step_column = header_row.get(0).unwrap_or("step").to_string();
    let mut time_list: Vec<f64> = Vec::with_capacity(steps);
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(steps); n * D];

    for (row, record) in reader.records().enumerate() {
        if time_list.len() == steps {
            break;
        }
        let record = record?;
        time_list.push(parse_field(&record, 0, row, &step_column)?);
        for (slot, (name, idx)) in wanted.iter().enumerate() {
            columns[slot].push(parse_field(&record, *idx, row, name)?);
        }
    }

    if time_list.len() < steps {
        return Err(OrreryError::TruncatedTable {
            declared: steps,
            available: time_list.len(),
        });
    }

    Ok(TrajectoryTable {
        columns,
        time_list,
        number_of_steps: steps,
    })
}

#[cfg(test)]
mod table_reader_test {
    use super::*;
    use crate::trajectories::header_reader::extract_header;

    /// Two bodies, three steps, 3D, laid out like the integrator output:
    /// blank filler lines between blocks, trailing separator on every row,
    /// velocity columns present, `NUM_STEPS` appended after the table.
    const FILE: &str = "\
NUM_BODIES
2

NAMES
Sun
Earth

MASSES
1.989e30
5.972e24

RADII
696340.0
6371.0

TRAJECTORIES
Step No,Sunx,Suny,Sunz,Sunvx,Sunvy,Sunvz,Earthx,Earthy,Earthz,Earthvx,Earthvy,Earthvz,
0.0,  0.1, -0.1,  0.0,  9.0,  9.0,  9.0,  1.0,  0.0,  0.5,  9.0,  9.0,  9.0,
1.0,  0.2, -0.2,  0.0,  9.0,  9.0,  9.0,  0.0,  1.0, -0.5,  9.0,  9.0,  9.0,
2.0,  0.3, -0.3,  0.0,  9.0,  9.0,  9.0, -1.0,  0.0,  0.5,  9.0,  9.0,  9.0,

NUM_STEPS
3
";

    #[test]
    fn test_autodetect_and_round_trip() {
        let header = extract_header(FILE).unwrap();
        let table = extract_table::<3>(FILE, &header, None).unwrap();

        assert_eq!(table.number_of_steps(), 3);
        // Earth x at frame 0 is exactly the value in column Earthx, row 0.
        assert_eq!(table.coord(1, 0, 0), 1.0);
        assert_eq!(table.coord(1, 2, 1), 0.0);
        assert_eq!(table.point(0, 1), nalgebra::vector![0.2, -0.2, 0.0]);
        assert_eq!(table.time_at(2), 2.0);
    }

    #[test]
    fn test_explicit_offset_matches_autodetect() {
        let header = extract_header(FILE).unwrap();
        // The header row of this fixture sits after 3*2 + 10 lines.
        let table = extract_table::<3>(FILE, &header, Some(16)).unwrap();
        assert_eq!(table.coord(1, 0, 2), 0.5);
    }

    #[test]
    fn test_two_dimensional_view_of_three_dimensional_file() {
        // Columns are looked up by name, so a 2D load of a 3D file just
        // ignores the z columns.
        let header = extract_header(FILE).unwrap();
        let table = extract_table::<2>(FILE, &header, None).unwrap();
        assert_eq!(table.point(1, 1), nalgebra::vector![0.0, 1.0]);
    }

    #[test]
    fn test_axis_prefix_is_contiguous() {
        let header = extract_header(FILE).unwrap();
        let table = extract_table::<3>(FILE, &header, None).unwrap();
        assert_eq!(table.axis_prefix(0, 0, 1), &[0.1, 0.2]);
        assert_eq!(table.axis_prefix(1, 1, 2), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_missing_z_column() {
        let content = "\
NUM_BODIES
1
NUM_STEPS
1
NAMES
Sun
MASSES
1.0
RADII
1.0
Step No,Sunx,Suny,
0.0, 0.1, 0.2,
";
        let header = extract_header(content).unwrap();
        let result = extract_table::<3>(content, &header, None);
        assert_eq!(
            result.unwrap_err(),
            OrreryError::MissingColumn("Sunz".to_string())
        );
    }

    #[test]
    fn test_fewer_rows_than_declared_steps() {
        let content = "\
NUM_BODIES
1
NUM_STEPS
5
NAMES
Sun
MASSES
1.0
RADII
1.0
Step No,Sunx,Suny,
0.0, 0.1, 0.2,
1.0, 0.3, 0.4,
";
        let header = extract_header(content).unwrap();
        let result = extract_table::<2>(content, &header, None);
        assert_eq!(
            result.unwrap_err(),
            OrreryError::TruncatedTable {
                declared: 5,
                available: 2,
            }
        );
    }

    #[test]
    fn test_non_numeric_cell() {
        let content = "\
NUM_BODIES
1
NUM_STEPS
1
NAMES
Sun
MASSES
1.0
RADII
1.0
Step No,Sunx,Suny,
0.0, what, 0.2,
";
        let header = extract_header(content).unwrap();
        let result = extract_table::<2>(content, &header, None);
        assert_eq!(
            result.unwrap_err(),
            OrreryError::MalformedRow {
                row: 0,
                column: "Sunx".to_string(),
                value: "what".to_string(),
            }
        );
    }

    #[test]
    fn test_rows_past_declared_steps_are_ignored() {
        let content = "\
NUM_BODIES
1
NUM_STEPS
2
NAMES
Sun
MASSES
1.0
RADII
1.0
Step No,Sunx,Suny,
0.0, 0.1, 0.2,
1.0, 0.3, 0.4,
2.0, junk, junk,
";
        let header = extract_header(content).unwrap();
        let table = extract_table::<2>(content, &header, None).unwrap();
        assert_eq!(table.number_of_steps(), 2);
        assert_eq!(table.time_list(), &[0.0, 1.0]);
    }
}
