use thiserror::Error;

use crate::trajectories::header_reader::ParseHeaderError;

/// Crate-wide error type.
///
/// Three families matter to callers: malformed input (header or table shape),
/// truncated data (fewer rows than the header declares), and out-of-range
/// frame requests during playback. All variants are raised synchronously at
/// the point of detection and propagate to the caller; the library never
/// retries or continues with partial data.
#[derive(Error, Debug)]
pub enum OrreryError {
    #[error("Error during the trajectory header parsing: {0}")]
    HeaderParsing(ParseHeaderError),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error in the tabular block: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Could not locate the tabular header row (no line names a {0} column)")]
    TableStartNotFound(String),

    #[error("Column {0} is missing from the trajectory table")]
    MissingColumn(String),

    #[error("Malformed value {value:?} in table column {column}, row {row}")]
    MalformedRow {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Table holds {available} data rows but the header declares {declared} steps")]
    TruncatedTable { declared: usize, available: usize },

    #[error("Frame {frame} is outside the playback range 0..{steps}")]
    FrameOutOfRange { frame: usize, steps: usize },

    #[error("Unsupported axis count {0}: trajectory files are 2D or 3D")]
    UnsupportedDimension(usize),

    #[error("Invalid playback parameter: {0}")]
    InvalidPlaybackParameter(String),
}

impl From<ParseHeaderError> for OrreryError {
    fn from(err: ParseHeaderError) -> Self {
        OrreryError::HeaderParsing(err)
    }
}

impl PartialEq for OrreryError {
    fn eq(&self, other: &Self) -> bool {
        use OrreryError::*;
        match (self, other) {
            (HeaderParsing(a), HeaderParsing(b)) => a == b,

            // Not comparable payloads: equal iff same variant
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            (TableStartNotFound(a), TableStartNotFound(b)) => a == b,
            (MissingColumn(a), MissingColumn(b)) => a == b,
            (
                MalformedRow {
                    row: r1,
                    column: c1,
                    value: v1,
                },
                MalformedRow {
                    row: r2,
                    column: c2,
                    value: v2,
                },
            ) => r1 == r2 && c1 == c2 && v1 == v2,
            (
                TruncatedTable {
                    declared: d1,
                    available: a1,
                },
                TruncatedTable {
                    declared: d2,
                    available: a2,
                },
            ) => d1 == d2 && a1 == a2,
            (
                FrameOutOfRange {
                    frame: f1,
                    steps: s1,
                },
                FrameOutOfRange {
                    frame: f2,
                    steps: s2,
                },
            ) => f1 == f2 && s1 == s2,
            (UnsupportedDimension(a), UnsupportedDimension(b)) => a == b,
            (InvalidPlaybackParameter(a), InvalidPlaybackParameter(b)) => a == b,

            _ => false,
        }
    }
}
