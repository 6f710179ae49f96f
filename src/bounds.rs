//! # Display bounds with symmetric outlier clamping
//!
//! Derives the static bounding box a renderer frames the animation with.
//!
//! ## Policy
//! -----------------
//! For each axis **independently**:
//!
//! 1. Compute the global min/max across all bodies' columns for that axis.
//! 2. Pick the symmetric limit `L`: the caller-requested limit for the axis,
//!    or `max(|global_min|, global_max)` when none was requested (a single
//!    positive bound reused for both sides).
//! 3. Clamp four ways about `±L`:
//!    * both sides exceed → `[-L, L]`
//!    * low side only → `[-L, global_max]`
//!    * high side only → `[global_min, L]`
//!    * neither → `[global_min, global_max]`
//!
//! This keeps an outlier body (a distant comet, say) from dominating the
//! display scale while still fitting all in-range bodies tightly. The box is
//! computed once per load and never recomputed during playback: framing is
//! static, not auto-zoom.

use log::debug;

use crate::playback::PlaybackParams;
use crate::trajectories::TrajectoryData;

/// Inclusive display range of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

/// Display bounding box, one [`AxisBounds`] per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds<const D: usize> {
    pub axes: [AxisBounds; D],
}

/// Symmetric limit for one axis: the requested value when given, otherwise
/// derived from the extrema. `Some(0.0)` keeps the legacy autoscale sentinel.
fn symmetric_limit(requested: Option<f64>, global_min: f64, global_max: f64) -> f64 {
    match requested {
        Some(limit) if limit > 0.0 => limit,
        _ => f64::max(global_min.abs(), global_max),
    }
}

/// The four-way clamp about `±limit`.
pub(crate) fn clamp_axis(global_min: f64, global_max: f64, limit: f64) -> AxisBounds {
    if global_min < -limit && global_max > limit {
        AxisBounds {
            min: -limit,
            max: limit,
        }
    } else if global_min < -limit {
        AxisBounds {
            min: -limit,
            max: global_max,
        }
    } else if global_max > limit {
        AxisBounds {
            min: global_min,
            max: limit,
        }
    } else {
        AxisBounds {
            min: global_min,
            max: global_max,
        }
    }
}

impl<const D: usize> ViewBounds<D> {
    /// Compute the display bounds of a loaded trajectory set.
    ///
    /// Pure function of the table and the requested limits: calling it twice
    /// on the same inputs yields identical bounds.
    pub fn compute(data: &TrajectoryData<D>, params: &PlaybackParams) -> ViewBounds<D> {
        let last = data.number_of_steps - 1;
        let axes = std::array::from_fn(|axis| {
            let mut global_min = f64::INFINITY;
            let mut global_max = f64::NEG_INFINITY;
            for body in 0..data.number_of_bodies() {
                for value in data.table.axis_prefix(body, axis, last) {
                    global_min = global_min.min(*value);
                    global_max = global_max.max(*value);
                }
            }
            let limit = symmetric_limit(params.limit(axis), global_min, global_max);
            clamp_axis(global_min, global_max, limit)
        });
        debug!("view bounds: {axes:?}");
        ViewBounds { axes }
    }
}
