use std::sync::Arc;

use approx::assert_relative_eq;
use camino::Utf8Path;

use orrery::{PlaybackParams, PlaybackState, TrajectoryData, ViewBounds};

#[test]
fn test_three_body_3d_end_to_end() {
    let data = Arc::new(
        TrajectoryData::<3>::new_from_file(Utf8Path::new("tests/data/three_body_3d.csv"), None)
            .unwrap(),
    );

    assert_eq!(data.number_of_bodies(), 3);
    assert_eq!(data.number_of_steps, 6);
    assert_eq!(data.bodies[1].name, "Earth");
    assert_relative_eq!(data.bodies[0].mass, 1.989e30);
    assert_relative_eq!(data.bodies[2].radius, 1737.4);

    // Position round trip: column Earthx, row 2 of the tabular block.
    let earth = data.body_index("Earth").unwrap();
    assert_relative_eq!(data.table.coord(earth, 2, 0), 0.3);

    let params = PlaybackParams::default();
    let bounds = ViewBounds::compute(&data, &params);
    // x: extrema (-1.0, 1.05), autoscaled L = 1.05, nothing clamped.
    assert_relative_eq!(bounds.axes[0].min, -1.0);
    assert_relative_eq!(bounds.axes[0].max, 1.05);
    // y keeps its own tight extrema.
    assert_relative_eq!(bounds.axes[1].min, -0.05);
    assert_relative_eq!(bounds.axes[1].max, 0.95);
    assert_relative_eq!(bounds.axes[2].min, -0.02);
    assert_relative_eq!(bounds.axes[2].max, 0.02);

    let mut playback = PlaybackState::new(data.clone(), &params);
    for frame in 0..data.number_of_steps {
        let snapshot = playback.advance(frame).unwrap();
        for (_, _, trail) in snapshot.iter() {
            assert_eq!(trail.len(), frame + 1);
        }
    }
    assert!(playback.at_last_frame());

    let snapshot = playback.snapshot();
    assert_eq!(snapshot.label, "5");
    let luna = snapshot.current_for("Luna").unwrap();
    assert_relative_eq!(luna.x, -0.95);
    assert_relative_eq!(luna.y, -0.05);
    assert_relative_eq!(luna.z, -0.02);
}

#[test]
fn test_table_location_both_filler_variants() {
    // The two fixtures differ in where NUM_STEPS lives (appended trailer vs
    // preamble block), which shifts the tabular header row. Auto-detection
    // must agree with the explicit line offsets.
    let k10 = std::fs::read_to_string("tests/data/three_body_3d.csv").unwrap();
    let auto = TrajectoryData::<3>::new_from_str(&k10, None).unwrap();
    let forced = TrajectoryData::<3>::new_from_str(&k10, Some(3 * 3 + 10)).unwrap();
    assert_eq!(auto.table.point(2, 4), forced.table.point(2, 4));

    let k13 = std::fs::read_to_string("tests/data/two_body_2d.csv").unwrap();
    let auto = TrajectoryData::<2>::new_from_str(&k13, None).unwrap();
    let forced = TrajectoryData::<2>::new_from_str(&k13, Some(3 * 2 + 13)).unwrap();
    assert_eq!(auto.table.point(1, 3), forced.table.point(1, 3));
}

#[test]
fn test_requested_limit_clamps_outliers() {
    let data = TrajectoryData::<3>::new_from_file(
        Utf8Path::new("tests/data/three_body_3d.csv"),
        None,
    )
    .unwrap();
    let params = PlaybackParams::builder().limit_x(0.5).build().unwrap();
    let bounds = ViewBounds::compute(&data, &params);
    // Both x sides exceed the requested limit: fully clamped.
    assert_relative_eq!(bounds.axes[0].min, -0.5);
    assert_relative_eq!(bounds.axes[0].max, 0.5);
    // y and z are untouched by the x limit.
    assert_relative_eq!(bounds.axes[1].max, 0.95);
}

#[test]
fn test_planar_view_of_spatial_file() {
    // A 2D playback of a 3D file ignores the z columns entirely.
    let data = Arc::new(
        TrajectoryData::<2>::new_from_file(Utf8Path::new("tests/data/three_body_3d.csv"), None)
            .unwrap(),
    );
    let mut playback = PlaybackState::new(data, &PlaybackParams::default());
    let snapshot = playback.advance(1).unwrap();
    let earth = snapshot.current_for("Earth").unwrap();
    assert_relative_eq!(earth.x, 0.8);
    assert_relative_eq!(earth.y, 0.6);
    assert_eq!(snapshot.trail_for("Sun").unwrap().len(), 2);
}

#[test]
fn test_two_body_2d_playback_with_throttling() {
    let data = Arc::new(
        TrajectoryData::<2>::new_from_file(Utf8Path::new("tests/data/two_body_2d.csv"), None)
            .unwrap(),
    );
    let params = PlaybackParams::builder().skip_frames(2).build().unwrap();
    let mut playback = PlaybackState::new(data.clone(), &params);

    playback.advance(0).unwrap();
    playback.advance(1).unwrap();
    // Frame 1 was skipped: the snapshot still shows frame 0.
    assert_eq!(playback.snapshot().frame, 0);
    assert_eq!(playback.snapshot().trails[1].len(), 1);

    let snapshot = playback.advance(2).unwrap();
    assert_eq!(snapshot.frame, 2);
    assert_eq!(snapshot.trails[1].len(), 3);
    let planet = snapshot.current_for("Planet").unwrap();
    assert_relative_eq!(planet.x, -1.5);

    let result = playback.advance(data.number_of_steps);
    assert!(matches!(
        result,
        Err(orrery::OrreryError::FrameOutOfRange { frame: 4, steps: 4 })
    ));
}
