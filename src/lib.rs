pub mod bounds;
pub mod constants;
pub mod orrery_errors;
pub mod playback;
pub mod trajectories;

pub use bounds::{AxisBounds, ViewBounds};
pub use constants::{Bodies, Frame};
pub use orrery_errors::OrreryError;
pub use playback::{FrameSnapshot, PlaybackParams, PlaybackState};
pub use trajectories::header_reader::Body;
pub use trajectories::TrajectoryData;
