//! Pose estimation tests against synthetic face meshes


use ar_face_filters::{
    mark_detection::LandmarkSet,
    pose_estimation::{project_points, CameraIntrinsics, Pose, PoseEstimator},
    Error,
};
use nalgebra::{Point2, Point3, Vector3};
use std::io::Write;
use test_helpers::posed_face_mesh;

#[test]
fn test_pose_recovered_from_face_mesh() {
    let frame_size = (640, 480);
    let poses = [
        Pose::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 4.0)),
        Pose::new(Vector3::new(0.2, 0.3, -0.1), Vector3::new(0.3, 0.1, 6.0)),
        Pose::new(Vector3::new(-0.15, -0.35, 0.2), Vector3::new(-0.4, 0.2, 3.5)),
    ];
    let estimator = PoseEstimator::new();

    for truth in &poses {
        let mesh = posed_face_mesh(truth, frame_size).unwrap();
        let pose = estimator.estimate_from_landmarks(frame_size, &mesh).unwrap();

        // Landmarks are rounded to f32, so compare reprojections in pixels
        let intrinsics = CameraIntrinsics::from_frame_size(frame_size.0, frame_size.1);
        let expected = project_points(estimator.model_points(), truth, &intrinsics);
        let actual = project_points(estimator.model_points(), &pose, &intrinsics);
        for (e, a) in expected.iter().zip(&actual) {
            let (e, a) = (e.unwrap(), a.unwrap());
            assert!((e - a).norm() < 1e-3, "reprojection drift for {truth:?}: {e} vs {a}");
        }
        assert!((pose.translation - truth.translation).norm() < 1e-2, "{pose:?} vs {truth:?}");
        assert!(pose.translation.z > 0.0);
    }
}

#[test]
fn test_pose_recovered_from_noisy_landmarks() {
    let frame_size = (640, 480);
    let intrinsics = CameraIntrinsics::from_frame_size(frame_size.0, frame_size.1);
    let estimator = PoseEstimator::new();
    let rotations = [
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(0.2, 0.0, 0.0),
        Vector3::new(0.0, 0.4, 0.0),
        Vector3::new(0.3, 0.5, 0.1),
        Vector3::new(-0.2, -0.3, 0.15),
    ];
    let translations = [
        Vector3::new(0.0, 0.0, 4.0),
        Vector3::new(0.5, -0.3, 6.0),
        Vector3::new(-0.4, 0.2, 3.5),
    ];

    let mut case = 0.0;
    for rotation in rotations {
        for translation in translations {
            for noise in [0.5, 1.0, 2.0] {
                case += 1.0;
                let truth = Pose::new(rotation, translation);
                let observed: Vec<Point2<f64>> = project_points(estimator.model_points(), &truth, &intrinsics)
                    .into_iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let p = p.unwrap();
                        let i = i as f64;
                        Point2::new(
                            p.x + noise * (1.3 * i + 0.7 * case).sin(),
                            p.y + noise * (2.1 * i + 0.3 * case).cos(),
                        )
                    })
                    .collect();

                let pose = estimator
                    .estimate(frame_size, &observed)
                    .unwrap_or_else(|e| panic!("{truth:?} with {noise} px noise: {e}"));

                // The solve minimises reprojection error, so it can do no worse than the true pose
                let reprojected = project_points(estimator.model_points(), &pose, &intrinsics);
                let rms = (reprojected
                    .iter()
                    .zip(&observed)
                    .map(|(r, o)| (r.unwrap() - o).norm_squared())
                    .sum::<f64>()
                    / (2.0 * observed.len() as f64))
                    .sqrt();
                assert!(rms <= 1.5 * noise, "rms {rms} for {truth:?} with {noise} px noise");
                assert!(
                    (pose.translation - truth.translation).norm() < 0.15 * truth.translation.z,
                    "{pose:?} vs {truth:?}"
                );
            }
        }
    }
}

#[test]
fn test_frontal_face_from_exact_points() {
    let frame_size = (640, 480);
    let intrinsics = CameraIntrinsics::from_frame_size(frame_size.0, frame_size.1);
    let estimator = PoseEstimator::new();
    let truth = Pose::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 3.0));
    let points: Vec<Point2<f64>> = project_points(estimator.model_points(), &truth, &intrinsics)
        .into_iter()
        .map(Option::unwrap)
        .collect();

    let pose = estimator.estimate(frame_size, &points).unwrap();
    assert!(pose.euler_degrees().norm() < 1e-4, "{pose:?}");
    assert!((pose.translation - truth.translation).norm() < 1e-6);
}

#[test]
fn test_euler_angles_follow_yaw() {
    let frame_size = (640, 480);
    let truth = Pose::new(Vector3::new(0.0, 20f64.to_radians(), 0.0), Vector3::new(0.0, 0.0, 5.0));
    let mesh = posed_face_mesh(&truth, frame_size).unwrap();
    let pose = PoseEstimator::new().estimate_from_landmarks(frame_size, &mesh).unwrap();

    let euler = pose.euler_degrees();
    assert!((euler[1] - 20.0).abs() < 0.1, "{euler:?}");
    assert!(euler[0].abs() < 0.1);
    assert!(euler[2].abs() < 0.1);
}

#[test]
fn test_short_landmark_set_is_insufficient() {
    let set = LandmarkSet::new(vec![Point2::new(1.0, 1.0); 250]);
    match PoseEstimator::new().estimate_from_landmarks((640, 480), &set) {
        Err(Error::InsufficientLandmarks { required, available }) => {
            assert_eq!(required, 6);
            // Indices 33, 1, 61 and 199 exist; 263 and 291 do not
            assert_eq!(available, 4);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_too_many_points_rejected() {
    let points = vec![Point2::new(1.0, 2.0); 7];
    assert!(matches!(
        PoseEstimator::new().estimate((640, 480), &points),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_coincident_points_fail() {
    let points = vec![Point2::new(320.0, 240.0); 6];
    assert!(matches!(
        PoseEstimator::new().estimate((640, 480), &points),
        Err(Error::PoseSolveFailed(_))
    ));
}

#[test]
fn test_model_file_override() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for point in [
        [-0.5, -0.3, 0.0],
        [0.5, -0.3, 0.0],
        [0.0, 0.0, 0.5],
        [-0.3, 0.4, 0.2],
        [0.3, 0.4, 0.2],
        [0.0, 0.8, 0.3],
    ] {
        for value in point {
            writeln!(file, "{value}").unwrap();
        }
    }
    let estimator = PoseEstimator::from_file(file.path()).unwrap();
    assert_eq!(estimator.model_points(), PoseEstimator::new().model_points());
    assert_eq!(estimator.model_points()[5], Point3::new(0.0, 0.8, 0.3));

    let mut short = tempfile::NamedTempFile::new().unwrap();
    writeln!(short, "1.0\n2.0").unwrap();
    assert!(matches!(PoseEstimator::from_file(short.path()), Err(Error::ConfigError(_))));

    assert!(matches!(PoseEstimator::from_file("missing/model.txt"), Err(Error::Io(_))));
}
