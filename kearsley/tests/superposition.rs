//! Public API tests for superposing rigidly transformed point sets

use kearsley::{
    apply_transform, bestfit, bestfit_objects, rmsd, rot_trans, ArgumentError, KearsleyError,
    Quaternion,
};
use nalgebra::{Matrix3, Rotation3, Vector3};
use ndarray::{array, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::thread;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Helix-like backbone trace, non-collinear for any length >= 3
fn helix(n: usize) -> Array2<f64> {
    Array2::from_shape_fn((n, 3), |(i, j)| {
        let t = i as f64 * 100f64.to_radians();
        match j {
            0 => 2.3 * t.cos(),
            1 => 2.3 * t.sin(),
            _ => 1.5 * i as f64,
        }
    })
}

/// Applies `p -> R⁻¹ · p + t` to every row.
fn move_rigidly(points: &Array2<f64>, rotation: &Matrix3<f64>, t: &Vector3<f64>) -> Array2<f64> {
    let inverse = rotation.transpose();
    let moved: Vec<Vector3<f64>> = points
        .rows()
        .into_iter()
        .map(|r| inverse * Vector3::new(r[0], r[1], r[2]) + t)
        .collect();
    Array2::from_shape_fn((moved.len(), 3), |(i, j)| moved[i][j])
}

fn max_abs_diff(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    (a - b).iter().fold(0.0, |m, d| m.max(d.abs()))
}

#[test]
fn test_unit_cube_rotated_about_z() {
    init_logging();

    let u = array![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 1.0, 0.0],
        [1.0, 0.0, 1.0],
        [0.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
    ];
    let rot = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
    let trans = Vector3::new(1.0, 2.0, 3.0);
    let v = move_rigidly(&u, &rot, &trans);

    assert!(rmsd(&u, &v).unwrap() < 1e-6);
    assert!(max_abs_diff(&apply_transform(&u, &v).unwrap(), &u) < 1e-6);

    let (r, t) = rot_trans(&u, &v).unwrap();
    assert!((r - rot).abs().max() < 1e-6);
    assert!((t - trans).abs().max() < 1e-6);
}

#[test]
fn test_helix_with_noise_recovers_transform_approximately() {
    init_logging();

    let mut rng = ChaCha8Rng::seed_from_u64(12345);
    let u = helix(30);
    let rotation = Rotation3::from_euler_angles(0.7, -1.2, 2.9).into_inner();
    let translation = Vector3::new(-3.0, 8.0, 0.25);

    let mut v = move_rigidly(&u, &rotation, &translation);
    v.mapv_inplace(|x| x + 0.01 * (rng.random::<f64>() - 0.5));

    let deviation = rmsd(&u, &v).unwrap();
    assert!(deviation > 0.0);
    assert!(deviation < 0.01);

    let (r, t) = rot_trans(&u, &v).unwrap();
    assert!((r - rotation).abs().max() < 1e-2);
    assert!((t - translation).abs().max() < 5e-2);
}

#[test]
fn test_quaternion_matches_rotation_up_to_sign() {
    let u = helix(10);
    let axis = Vector3::new(0.0, 1.0, 0.0);
    let q = Quaternion::from_axis_angle(&axis, 0.8);
    let v = move_rigidly(&u, &q.to_rotation_matrix(), &Vector3::zeros());

    let fit = bestfit(&u, &v).unwrap();
    let dot = fit.quaternion.to_vector4().dot(&q.to_vector4());
    assert!((dot.abs() - 1.0).abs() < 1e-9);
}

#[test]
fn test_concurrent_calls_agree() {
    let u = helix(25);
    let v = move_rigidly(
        &u,
        &Rotation3::from_euler_angles(1.0, 0.5, -0.25).into_inner(),
        &Vector3::new(4.0, -4.0, 1.0),
    );
    let expected = bestfit(&u, &v).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let (u, v) = (u.clone(), v.clone());
            thread::spawn(move || bestfit(&u, &v).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_object_slices() {
    let reference = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.5, 0.0, 0.0),
        Vector3::new(0.0, 2.0, 0.0),
        Vector3::new(0.0, 0.0, 2.5),
    ];
    let mobile: Vec<[f64; 3]> = reference.iter().map(|p| [p.x + 1.0, p.y, p.z - 1.0]).collect();

    let fit = bestfit_objects(&reference, &mobile).unwrap();
    assert!(fit.rmsd < 1e-6);
    assert!((fit.translation() - Vector3::new(1.0, 0.0, -1.0)).abs().max() < 1e-9);
}

#[test]
fn test_shape_errors() {
    let u = helix(5);
    let four_cols = Array2::<f64>::zeros((5, 4));

    let err = rmsd(&four_cols, &u).unwrap_err();
    assert_eq!(err, KearsleyError::InvalidArgument(ArgumentError::ReferenceColumns(4)));
    assert_eq!(
        err.to_string(),
        "Invalid argument: reference points must have shape [n_points, 3], got 4 columns"
    );

    assert!(matches!(
        rmsd(&u, &four_cols),
        Err(KearsleyError::InvalidArgument(ArgumentError::MobileColumns(4)))
    ));
    assert!(matches!(
        rmsd(&u, &helix(6)),
        Err(KearsleyError::InvalidArgument(ArgumentError::RowCountMismatch {
            reference: 5,
            mobile: 6
        }))
    ));
}
