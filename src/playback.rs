//! # Frame-indexed playback
//!
//! This module defines the [`PlaybackParams`] configuration struct and its
//! builder, plus [`PlaybackState`], the state machine a renderer drives one
//! [`advance`](PlaybackState::advance) call per display tick.
//!
//! ## Purpose
//!
//! [`PlaybackParams`] centralizes the caller-supplied knobs:
//!
//! - Per-axis display limits (absent or `0.0` = autoscale), consumed by
//!   [`ViewBounds::compute`](crate::bounds::ViewBounds::compute),
//! - `skip_frames` throttling stride for long runs,
//! - `table_offset` override for the tabular block location.
//!
//! [`PlaybackState`] owns the trail buffers and the current-position snapshot.
//! States are the frame indices `0..=number_of_steps-1`; the initial state is
//! frame 0 and the terminal state is the last frame. The core never wraps:
//! stopping or looping is the renderer's policy (loopers call
//! [`rewind`](PlaybackState::rewind), which starts a fresh trail session).
//!
//! ## Per-advance contract
//!
//! On an update frame (`frame % skip_frames == 0`):
//!
//! 1. every body's trail buffer grows to the full prefix `[0, frame]`
//!    (buffers only ever grow within a session),
//! 2. `current` becomes the position row at `frame`,
//! 3. the display label is recomputed from the step/time column.
//!
//! Skipped frames record the frame index but re-emit the previous snapshot
//! unchanged.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use camino::Utf8Path;
//! use orrery::{PlaybackParams, PlaybackState, TrajectoryData, ViewBounds};
//!
//! # fn run() -> Result<(), orrery::OrreryError> {
//! let params = PlaybackParams::builder().limit_x(5.0).skip_frames(2).build()?;
//! let data = Arc::new(TrajectoryData::<2>::new_from_file(
//!     Utf8Path::new("solar.csv"),
//!     params.table_offset,
//! )?);
//! let bounds = ViewBounds::compute(&data, &params);
//!
//! let mut playback = PlaybackState::new(data.clone(), &params);
//! for frame in 0..data.number_of_steps {
//!     let snapshot = playback.advance(frame)?;
//!     // hand snapshot.current / snapshot.trails / snapshot.label and the
//!     // bounds to the renderer
//! }
//! # Ok(()) }
//! ```

use std::sync::Arc;

use log::trace;
use nalgebra::SVector;

use crate::constants::{Bodies, Frame, DEFAULT_SKIP_FRAMES};
use crate::orrery_errors::OrreryError;
use crate::trajectories::header_reader::Body;
use crate::trajectories::TrajectoryData;

/// Caller-supplied playback configuration.
///
/// Build with [`PlaybackParams::builder`]; [`Default`] gives autoscaled axes,
/// no throttling and table auto-detection.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackParams {
    /// Requested symmetric display limit per axis; `None` or `Some(0.0)`
    /// autoscales from the data.
    pub limit_x: Option<f64>,
    pub limit_y: Option<f64>,
    pub limit_z: Option<f64>,
    /// Visible-state update stride; 1 updates every frame.
    pub skip_frames: usize,
    /// Explicit line count before the tabular header row; `None` auto-detects.
    pub table_offset: Option<usize>,
}

impl PlaybackParams {
    /// Construct [`PlaybackParams`] with default values, equivalent to
    /// [`PlaybackParams::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`PlaybackParamsBuilder`].
    ///
    /// This is a fluent builder with validation at
    /// [`build`](PlaybackParamsBuilder::build) time.
    pub fn builder() -> PlaybackParamsBuilder {
        PlaybackParamsBuilder::new()
    }

    /// Requested limit for axis index 0/1/2 (x/y/z).
    pub fn limit(&self, axis: usize) -> Option<f64> {
        match axis {
            0 => self.limit_x,
            1 => self.limit_y,
            _ => self.limit_z,
        }
    }
}

impl Default for PlaybackParams {
    fn default() -> Self {
        PlaybackParams {
            limit_x: None,
            limit_y: None,
            limit_z: None,
            skip_frames: DEFAULT_SKIP_FRAMES,
            table_offset: None,
        }
    }
}

/// Builder for [`PlaybackParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct PlaybackParamsBuilder {
    params: PlaybackParams,
}

impl PlaybackParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: PlaybackParams::default(),
        }
    }

    pub fn limit_x(mut self, v: f64) -> Self {
        self.params.limit_x = Some(v);
        self
    }
    pub fn limit_y(mut self, v: f64) -> Self {
        self.params.limit_y = Some(v);
        self
    }
    pub fn limit_z(mut self, v: f64) -> Self {
        self.params.limit_z = Some(v);
        self
    }
    pub fn skip_frames(mut self, v: usize) -> Self {
        self.params.skip_frames = v;
        self
    }
    pub fn table_offset(mut self, v: usize) -> Self {
        self.params.table_offset = Some(v);
        self
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `skip_frames >= 1` – a zero stride would never update visible state.
    /// * Each requested limit must be finite and non-negative (`0.0` is the
    ///   autoscale sentinel; the limit is a magnitude, the sign is applied by
    ///   the clamp policy).
    ///
    /// Returns
    /// -----------------
    /// * `Ok(PlaybackParams)` when all values are valid.
    /// * `Err(OrreryError::InvalidPlaybackParameter)` otherwise.
    pub fn build(self) -> Result<PlaybackParams, OrreryError> {
        let p = &self.params;

        if p.skip_frames == 0 {
            return Err(OrreryError::InvalidPlaybackParameter(
                "skip_frames must be >= 1".into(),
            ));
        }
        for (axis, limit) in [("x", p.limit_x), ("y", p.limit_y), ("z", p.limit_z)] {
            if let Some(v) = limit {
                if !v.is_finite() || v < 0.0 {
                    return Err(OrreryError::InvalidPlaybackParameter(format!(
                        "limit_{axis} must be finite and non-negative, got {v}"
                    )));
                }
            }
        }

        Ok(self.params)
    }
}

/// Per-frame geometry handed to the renderer.
///
/// Borrows from the [`PlaybackState`] that produced it; everything here is
/// valid until the next `advance` call.
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a, const D: usize> {
    /// Frame index this snapshot reflects (the last *update* frame when
    /// throttling, which may trail the last `advance` argument).
    pub frame: Frame,
    /// Ordered body metadata, aligned with `current` and `trails`.
    pub bodies: &'a Bodies,
    /// One position per body at `frame`.
    pub current: &'a [SVector<f64, D>],
    /// One polyline per body covering frames `[0, frame]`.
    pub trails: &'a [Vec<SVector<f64, D>>],
    /// Display label from the file's step/time column.
    pub label: &'a str,
}

impl<'a, const D: usize> FrameSnapshot<'a, D> {
    /// Current position of the body named `name`.
    pub fn current_for(&self, name: &str) -> Option<&'a SVector<f64, D>> {
        let idx = self.bodies.iter().position(|b| b.name == name)?;
        Some(&self.current[idx])
    }

    /// Trail polyline of the body named `name`.
    pub fn trail_for(&self, name: &str) -> Option<&'a [SVector<f64, D>]> {
        let idx = self.bodies.iter().position(|b| b.name == name)?;
        Some(&self.trails[idx])
    }

    /// Iterate bodies with their current position and trail, in system order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&'a Body, &'a SVector<f64, D>, &'a [SVector<f64, D>])> + '_ {
        self.bodies
            .iter()
            .zip(self.current.iter())
            .zip(self.trails.iter())
            .map(|((body, current), trail)| (body, current, trail.as_slice()))
    }
}

/// The frame-indexed playback state machine.
///
/// Owns the trail-accumulation buffers for one playback session; they are
/// exclusively appended to between [`new`](PlaybackState::new)/
/// [`rewind`](PlaybackState::rewind) and the end of the session.
#[derive(Debug, Clone)]
pub struct PlaybackState<const D: usize> {
    data: Arc<TrajectoryData<D>>,
    skip_frames: usize,
    /// State-machine position: the argument of the last `advance` call.
    frame: Frame,
    /// Last frame that updated visible state; trails the position when
    /// throttling.
    visible_frame: Frame,
    trails: Vec<Vec<SVector<f64, D>>>,
    current: Vec<SVector<f64, D>>,
    label: String,
}

impl<const D: usize> PlaybackState<D> {
    /// Start a playback session at frame 0.
    ///
    /// `current` and the label reflect frame 0 immediately; trails start empty
    /// and grow on the first `advance`.
    pub fn new(data: Arc<TrajectoryData<D>>, params: &PlaybackParams) -> Self {
        let n = data.number_of_bodies();
        let current = (0..n).map(|body| data.table.point(body, 0)).collect();
        let label = data.table.time_at(0).to_string();
        PlaybackState {
            skip_frames: params.skip_frames,
            frame: 0,
            visible_frame: 0,
            trails: vec![Vec::new(); n],
            current,
            label,
            data,
        }
    }

    /// Frame index of the last `advance` call (0 before any).
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// True once playback has reached the terminal state.
    pub fn at_last_frame(&self) -> bool {
        self.frame + 1 == self.data.number_of_steps
    }

    /// Advance to `frame` and return the geometry to draw.
    ///
    /// On an update frame (multiple of `skip_frames`) the trail buffers grow
    /// to the prefix `[0, frame]`, `current` and the label are recomputed;
    /// otherwise the previous snapshot is re-emitted unchanged. The frame must
    /// lie in `0..number_of_steps`; the core neither stops nor wraps on its
    /// own.
    pub fn advance(&mut self, frame: Frame) -> Result<FrameSnapshot<'_, D>, OrreryError> {
        let steps = self.data.number_of_steps;
        if frame >= steps {
            return Err(OrreryError::FrameOutOfRange { frame, steps });
        }
        self.frame = frame;

        if frame % self.skip_frames == 0 {
            for (body, trail) in self.trails.iter_mut().enumerate() {
                for f in trail.len()..=frame {
                    trail.push(self.data.table.point(body, f));
                }
                self.current[body] = self.data.table.point(body, frame);
            }
            self.label = self.data.table.time_at(frame).to_string();
            self.visible_frame = frame;
            trace!("frame {frame}: visible state updated");
        } else {
            trace!("frame {frame}: skipped (stride {})", self.skip_frames);
        }

        Ok(self.snapshot())
    }

    /// Start a fresh session: frame 0, empty trails. For renderers that loop.
    pub fn rewind(&mut self) {
        self.frame = 0;
        self.visible_frame = 0;
        for trail in &mut self.trails {
            trail.clear();
        }
        for (body, current) in self.current.iter_mut().enumerate() {
            *current = self.data.table.point(body, 0);
        }
        self.label = self.data.table.time_at(0).to_string();
    }

    /// The geometry of the last update frame.
    pub fn snapshot(&self) -> FrameSnapshot<'_, D> {
        FrameSnapshot {
            frame: self.visible_frame,
            bodies: &self.data.bodies,
            current: &self.current,
            trails: &self.trails,
            label: &self.label,
        }
    }
}
