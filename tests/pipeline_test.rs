//! End-to-end tests of the frame loop with fake detectors and providers


use ar_face_filters::{
    app::{ArApp, DisplayToggles},
    face_detection::BoundingBox,
    filters::{Anchor, FilterKind, FilterRegistry, OverlayFilter, PoseAxesFilter},
    frame_source::{DirectorySink, ImageDirSource, Key},
    mark_detection::NullLandmarkProvider,
    placement::Placement,
    pose_estimation::{Pose, PoseEstimator},
    utils::BOX_COLOR,
    Error, Frame,
};
use image::{Rgb, Rgba};
use nalgebra::Vector3;
use test_helpers::{gray_frame, posed_face_mesh, solid_asset, FakeDetector, FakeProvider, QueueSource, ScriptedSink};

fn overlay(color: Rgba<u8>, anchor: Anchor) -> FilterKind {
    FilterKind::Overlay(OverlayFilter::new(solid_asset(10, 10, color), Placement::new(1.0).unwrap(), anchor))
}

fn no_debug_drawing() -> DisplayToggles {
    DisplayToggles {
        show_boxes: false,
        show_mesh: false,
    }
}

#[test]
fn test_units_composite_in_draw_order() {
    let mut registry = FilterRegistry::new();
    registry.add("top", overlay(Rgba([0, 0, 255, 255]), Anchor::FaceBox), true, 2);
    registry.add("bottom", overlay(Rgba([255, 0, 0, 255]), Anchor::FaceBox), true, 1);

    let mut app = ArApp::new(
        Box::new(QueueSource::new(Vec::new())),
        Box::new(FakeDetector {
            faces: vec![BoundingBox::new(40, 40, 20, 20)],
            fail: false,
        }),
        Box::new(NullLandmarkProvider),
        registry,
        Box::new(ScriptedSink::new(Vec::new())),
    )
    .with_display(no_debug_drawing());

    let mut frame = gray_frame(128, 128, 0);
    let stats = app.process_frame(&mut frame);
    assert_eq!(stats.faces, 1);
    assert_eq!(stats.landmarks, 0);
    assert_eq!(stats.filters_applied, 2);
    assert_eq!(*frame.get_pixel(50, 45), Rgb([0, 0, 255]));
}

#[test]
fn test_failing_detector_does_not_abort_frame() {
    let mut registry = FilterRegistry::new();
    registry.add("glasses", overlay(Rgba([255, 0, 0, 255]), Anchor::FaceBox), true, 0);

    let mut app = ArApp::new(
        Box::new(QueueSource::new(Vec::new())),
        Box::new(FakeDetector {
            faces: Vec::new(),
            fail: true,
        }),
        Box::new(NullLandmarkProvider),
        registry,
        Box::new(ScriptedSink::new(Vec::new())),
    );

    let mut frame = gray_frame(32, 32, 9);
    let stats = app.process_frame(&mut frame);
    assert_eq!(stats.faces, 0);
    assert_eq!(stats.filters_applied, 1);
    assert!(frame.pixels().all(|p| *p == Rgb([9, 9, 9])));
}

#[test]
fn test_landmark_filters_and_debug_drawing() {
    let frame_size = (320, 240);
    let mesh = posed_face_mesh(
        &Pose::new(Vector3::new(0.1, -0.1, 0.0), Vector3::new(0.0, 0.0, 4.0)),
        frame_size,
    )
    .unwrap();

    let mut registry = FilterRegistry::new();
    registry.add("nose", overlay(Rgba([255, 0, 0, 255]), Anchor::NoseTip), true, 0);
    registry.add(
        "axes",
        FilterKind::PoseAxes(PoseAxesFilter::new(PoseEstimator::new(), None, 1.0, 1.0).unwrap()),
        true,
        1,
    );

    let face = BoundingBox::new(2, 2, 30, 30);
    let mut app = ArApp::new(
        Box::new(QueueSource::new(Vec::new())),
        Box::new(FakeDetector {
            faces: vec![face],
            fail: false,
        }),
        Box::new(FakeProvider {
            landmarks: vec![mesh],
        }),
        registry,
        Box::new(ScriptedSink::new(Vec::new())),
    );

    let mut frame = Frame::new(frame_size.0, frame_size.1);
    let stats = app.process_frame(&mut frame);
    assert_eq!(stats.landmarks, 1);
    assert_eq!(stats.landmark_points, 468);
    assert_eq!(stats.hud_text(), "faces:1 landmarks:468");
    assert_eq!(stats.filters_applied, 2);
    assert_eq!(*frame.get_pixel(2, 2), BOX_COLOR);
    assert!(frame.pixels().any(|p| *p == Rgb([255, 0, 0])));
}

#[test]
fn test_run_stops_on_quit_key() {
    let frames = vec![gray_frame(16, 16, 0), gray_frame(16, 16, 0), gray_frame(16, 16, 0)];
    let mut app = ArApp::new(
        Box::new(QueueSource::new(frames)),
        Box::new(FakeDetector {
            faces: Vec::new(),
            fail: false,
        }),
        Box::new(NullLandmarkProvider),
        FilterRegistry::new(),
        Box::new(ScriptedSink::new(vec![None, Some(Key::Quit)])),
    );
    assert_eq!(app.run().unwrap(), 2);
}

#[test]
fn test_source_failure_ends_loop_with_error() {
    let mut source = QueueSource::new(vec![gray_frame(8, 8, 0)]);
    source.fail_at_end = true;
    let mut app = ArApp::new(
        Box::new(source),
        Box::new(FakeDetector {
            faces: Vec::new(),
            fail: false,
        }),
        Box::new(NullLandmarkProvider),
        FilterRegistry::new(),
        Box::new(ScriptedSink::new(Vec::new())),
    );
    assert!(matches!(app.run(), Err(Error::FrameReadFailed(_))));
}

#[test]
fn test_directory_pipeline_writes_frames() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for i in 0..3 {
        gray_frame(48, 48, 20).save(input.path().join(format!("img_{i}.png"))).unwrap();
    }

    let mut registry = FilterRegistry::new();
    registry.add("glasses", overlay(Rgba([255, 255, 255, 255]), Anchor::FaceBox), true, 0);

    let mut app = ArApp::new(
        Box::new(ImageDirSource::new(input.path()).unwrap()),
        Box::new(FakeDetector {
            faces: vec![BoundingBox::new(10, 10, 20, 20)],
            fail: false,
        }),
        Box::new(NullLandmarkProvider),
        registry,
        Box::new(DirectorySink::new(output.path()).unwrap()),
    )
    .with_display(no_debug_drawing());

    assert_eq!(app.run().unwrap(), 3);
    let written = image::open(output.path().join("frame_00002.png")).unwrap().into_rgb8();
    assert_eq!(*written.get_pixel(20, 5), Rgb([255, 255, 255]));
    assert_eq!(*written.get_pixel(5, 40), Rgb([20, 20, 20]));
}
