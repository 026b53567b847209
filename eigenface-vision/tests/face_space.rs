use anyhow::Result;
use eigenface_vision::{
    face_space_distance, project, Corpus, EigenspaceBuilder, Eigenfaces, FaceImage,
    FaceSpaceError, ImageDims, UserFace,
};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DIMS: ImageDims = ImageDims::new(16, 12);

/// Smooth "face-like" images: a shared base plus a few low-frequency patterns.
fn faces(rng: &mut StdRng, count: usize) -> Vec<FaceImage> {
    let patterns: Vec<Array2<f64>> = (0..6)
        .map(|k| {
            Array2::from_shape_fn((DIMS.height, DIMS.width), |(y, x)| {
                let fy = (k + 1) as f64 * y as f64 / DIMS.height as f64;
                let fx = (k % 3 + 1) as f64 * x as f64 / DIMS.width as f64;
                40.0 * (fy * 3.1 + fx * 2.3).sin()
            })
        })
        .collect();
    (0..count)
        .map(|_| {
            let mut img = Array2::from_elem((DIMS.height, DIMS.width), 120.0);
            for p in &patterns {
                img.scaled_add(rng.gen_range(-1.0..1.0), p);
            }
            FaceImage::new(img)
        })
        .collect()
}

fn noise(rng: &mut StdRng, dims: ImageDims) -> FaceImage {
    FaceImage::new(Array2::from_shape_fn((dims.height, dims.width), |_| {
        rng.gen_range(0.0..255.0)
    }))
}

fn corpus(seed: u64, training: usize, users: usize) -> Corpus {
    let mut rng = StdRng::seed_from_u64(seed);
    let training = faces(&mut rng, training);
    let users = faces(&mut rng, users)
        .into_iter()
        .enumerate()
        .map(|(i, img)| UserFace::new(format!("user{i}"), img))
        .collect();
    Corpus::new(DIMS, training, users).unwrap()
}

fn assert_close(a: &Array1<f64>, b: &Array1<f64>, tol: f64) {
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() <= tol, "{x} vs {y}");
    }
}

#[test]
fn test_projection_is_affine() -> Result<()> {
    env_logger::try_init().ok();
    let space = EigenspaceBuilder::new(4, 2).build(&corpus(1, 10, 3))?;
    let mut rng = StdRng::seed_from_u64(99);
    let y1 = noise(&mut rng, DIMS);
    let y2 = noise(&mut rng, DIMS);
    let (a, b) = (0.3, 0.7);

    let mixed = FaceImage::new(y1.pixels() * a + y2.pixels() * b);
    let lhs = project(&mixed, &space)?.into_inner();
    let rhs = project(&y1, &space)?.into_inner() * a + project(&y2, &space)?.into_inner() * b;
    assert_close(&lhs, &rhs, 1e-8);
    Ok(())
}

#[test]
fn test_mean_face_is_closer_to_face_space_than_noise() -> Result<()> {
    let space = EigenspaceBuilder::default().build(&corpus(2, 24, 4))?;
    let mut rng = StdRng::seed_from_u64(3);
    let mean = space.mean_face()?;
    let mean_distance = face_space_distance(&mean, &space)?;
    for _ in 0..5 {
        assert!(mean_distance <= face_space_distance(&noise(&mut rng, DIMS), &space)?);
    }
    Ok(())
}

#[test]
fn test_rebuild_is_stable_up_to_sign() -> Result<()> {
    let mut eigen = Eigenfaces::new(corpus(4, 12, 3), EigenspaceBuilder::new(6, 2));
    let first = eigen.build()?.clone();
    let second = eigen.build()?.clone();

    assert_eq!(first.mean(), second.mean());
    for (a, b) in first.eigenfaces().rows().into_iter().zip(second.eigenfaces().rows()) {
        let same = a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-9);
        let flipped = a.iter().zip(b.iter()).all(|(x, y)| (x + y).abs() < 1e-9);
        assert!(same || flipped);
    }
    Ok(())
}

#[test]
fn test_query_from_users_has_zero_identity_distance() -> Result<()> {
    let mut eigen = Eigenfaces::new(corpus(5, 10, 4), EigenspaceBuilder::new(5, 2));
    let query = eigen.corpus().users()[2].image.clone();
    let result = eigen.classify(&query)?;
    assert_eq!(result.nearest_identity_distance, 0.0);
    assert_eq!(result.nearest_user.index, 2);
    assert_eq!(result.nearest_user.label, "user2");
    Ok(())
}

#[test]
fn test_minimum_corpus_size() -> Result<()> {
    let builder = EigenspaceBuilder::default();
    let k = builder.face_number;

    let space = builder.build(&corpus(6, k + 2, 0))?;
    assert_eq!(space.face_number(), k);

    let err = builder.build(&corpus(6, k + 1, 0)).unwrap_err();
    assert!(matches!(err, FaceSpaceError::InsufficientSamples { available, needed, .. }
        if available == k + 1 && needed == k + 2));
    Ok(())
}

#[test]
fn test_classify_without_users() -> Result<()> {
    let mut eigen = Eigenfaces::new(corpus(7, 8, 0), EigenspaceBuilder::new(3, 2));
    let query = eigen.corpus().training()[0].clone();
    assert_eq!(eigen.classify(&query).unwrap_err(), FaceSpaceError::NoUsers);
    // The space built on the way stays usable.
    assert!(eigen.space().is_some());
    Ok(())
}

#[test]
fn test_failed_rebuild_keeps_previous_space() -> Result<()> {
    let previous = EigenspaceBuilder::new(3, 0).build(&corpus(8, 6, 0))?;
    let mut eigen = Eigenfaces::with_space(
        corpus(9, 4, 0),
        EigenspaceBuilder::new(5, 2),
        previous.clone(),
    )?;
    let err = eigen.build().unwrap_err();
    assert!(matches!(err, FaceSpaceError::InsufficientSamples { .. }));
    assert_eq!(eigen.space(), Some(&previous));
    Ok(())
}

#[test]
fn test_query_errors_leave_space_untouched() -> Result<()> {
    let mut eigen = Eigenfaces::new(corpus(10, 8, 2), EigenspaceBuilder::new(3, 2));
    let before = eigen.build()?.clone();
    let wrong = FaceImage::new(Array2::zeros((DIMS.width, DIMS.height)));
    assert!(matches!(
        eigen.classify(&wrong),
        Err(FaceSpaceError::DimensionMismatch { .. })
    ));
    assert_eq!(eigen.space(), Some(&before));
    Ok(())
}
