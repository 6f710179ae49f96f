//! # Constants and type definitions for orrery
//!
//! This module centralizes the **type aliases** and small fixed values used
//! throughout the `orrery` library.
//!
//! ## Overview
//!
//! - Frame and axis indexing conventions
//! - Container types for body metadata and column lookup
//! - Default playback parameters
//!
//! These definitions are used by the ingestion, bounds, and playback modules.

use crate::trajectories::header_reader::Body;
use ahash::RandomState;
use smallvec::SmallVec;
use std::collections::HashMap;

// -------------------------------------------------------------------------------------------------
// Indexing conventions
// -------------------------------------------------------------------------------------------------

/// Zero-based index of one time step in the trajectory table
pub type Frame = usize;

/// Column suffixes in axis order: a body named `Earth` owns columns
/// `Earthx`, `Earthy` and (in 3D files) `Earthz`
pub const AXIS_SUFFIXES: [&str; 3] = ["x", "y", "z"];

/// Default playback stride: every frame updates the visible state
pub const DEFAULT_SKIP_FRAMES: usize = 1;

// -------------------------------------------------------------------------------------------------
// Data containers
// -------------------------------------------------------------------------------------------------

/// The ordered body list of a system.
///
/// Order is significant: it is the column order of the tabular block and the
/// color order of downstream renderers. Ten inline slots cover the classical
/// solar system without spilling to the heap.
pub type Bodies = SmallVec<[Body; 10]>;

/// Lookup table from column name to column index in the tabular block.
///
/// Uses [`ahash`](https://docs.rs/ahash) for fast hashing.
pub type ColumnIndex = HashMap<String, usize, RandomState>;
