//! # Trajectories: ingestion and storage
//!
//! High-level facilities to **ingest** a trajectory file and **store** its
//! contents for playback. The central type is [`TrajectoryData`], the
//! immutable data root built from one file read: the ordered body list from
//! the keyword header plus the frame-indexed coordinate table.
//!
//! Modules
//! -----------------
//! * [`header_reader`](crate::trajectories::header_reader) – Keyword-marker
//!   header scan producing [`Body`](crate::trajectories::header_reader::Body)
//!   records and the declared step count.
//! * [`table_reader`](crate::trajectories::table_reader) – CSV tabular block
//!   load into a column-addressable
//!   [`TrajectoryTable`](crate::trajectories::table_reader::TrajectoryTable).
//!
//! Data Model
//! -----------------
//! * **Bodies:** `SmallVec<Body>` in file order; a body's index selects its
//!   table columns and its renderer color.
//! * **Table:** per body `D` coordinate columns (`D` = 2 or 3) with exactly
//!   `number_of_steps` rows, plus the step/time column kept aside for display
//!   labels. Housekeeping columns (step, velocities, trailing artifact) are
//!   dropped on load.
//!
//! Resource model
//! -----------------
//! The file is read **once** under scoped acquisition; the handle is released
//! on every path, including parse failure. The loaded [`TrajectoryData`] is
//! never mutated afterward, so any number of readers may share it (downstream
//! consumers hold it behind an [`std::sync::Arc`]).

use camino::Utf8Path;
use log::info;

use crate::constants::{Bodies, Frame};
use crate::orrery_errors::OrreryError;

pub mod header_reader;
pub mod table_reader;

use table_reader::TrajectoryTable;

/// A fully loaded trajectory file: body metadata plus the coordinate table.
///
/// `D` is the axis count of the playback view (2 or 3). Columns are looked up
/// by name, so a 2D view of a 3D file simply ignores the `z` columns.
#[derive(Debug, Clone)]
pub struct TrajectoryData<const D: usize> {
    pub bodies: Bodies,
    pub number_of_steps: usize,
    pub table: TrajectoryTable<D>,
}

impl<const D: usize> TrajectoryData<D> {
    /// Read and parse a trajectory file.
    ///
    /// Arguments
    /// -----------------
    /// * `path` – Path to the trajectory file.
    /// * `table_offset` – Explicit line count to skip before the tabular
    ///   header row, or `None` to auto-detect
    ///   (see [`PlaybackParams`](crate::playback::PlaybackParams)).
    ///
    /// Return
    /// ----------
    /// * The loaded [`TrajectoryData`], or the first
    ///   [`OrreryError`] found in the header or table.
    pub fn new_from_file(path: &Utf8Path, table_offset: Option<usize>) -> Result<Self, OrreryError> {
        let content = std::fs::read_to_string(path)?;
        let data = Self::new_from_str(&content, table_offset)?;
        info!(
            "loaded {}: {} bodies, {} steps",
            path,
            data.number_of_bodies(),
            data.number_of_steps
        );
        Ok(data)
    }

    /// Parse a trajectory file already held in memory.
    pub fn new_from_str(content: &str, table_offset: Option<usize>) -> Result<Self, OrreryError> {
        let header = header_reader::extract_header(content)?;
        let table = table_reader::extract_table::<D>(content, &header, table_offset)?;
        Ok(TrajectoryData {
            bodies: header.bodies,
            number_of_steps: header.number_of_steps,
            table,
        })
    }

    pub fn number_of_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// Index of the body named `name`, if any. Linear scan; body lists are
    /// small by construction.
    pub fn body_index(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }

    /// Step/time column value at `frame`.
    pub fn time_at(&self, frame: Frame) -> f64 {
        self.table.time_at(frame)
    }
}

#[cfg(test)]
mod trajectory_data_test {
    use super::*;

    const FILE: &str = "\
NUM_BODIES
1
NUM_STEPS
2
NAMES
Ceres
MASSES
9.38e20
RADII
473.0
Step No,Ceresx,Ceresy,
0.0, 2.55, 0.0,
1.0, 2.54, 0.12,
";

    #[test]
    fn test_new_from_str() {
        let data = TrajectoryData::<2>::new_from_str(FILE, None).unwrap();
        assert_eq!(data.number_of_bodies(), 1);
        assert_eq!(data.body_index("Ceres"), Some(0));
        assert_eq!(data.body_index("Pluto"), None);
        assert_eq!(data.table.coord(0, 1, 1), 0.12);
        assert_eq!(data.time_at(0), 0.0);
    }

    #[test]
    fn test_missing_file() {
        let result = TrajectoryData::<2>::new_from_file(
            Utf8Path::new("does/not/exist.csv"),
            None,
        );
        assert!(matches!(result, Err(OrreryError::IoError(_))));
    }
}
