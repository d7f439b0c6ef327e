//! API Regression Tests for the quoting pipeline
//!
//! These tests pin the end-to-end behavior of the public API, from uploaded
//! bytes to a price. They are organized in tiers that follow the pipeline:
//!
//! - Tier 1: Measurement (closed cuboids, translation, reordering, empty input)
//! - Tier 2: Formats (binary STL end to end, OBJ objects, rejected files)
//! - Tier 3: Pricing (shell correction, price arithmetic)
//! - Tier 4: Sessions (last file wins)
//!
//! If any of these tests fail after API changes, it indicates a breaking change
//! that needs documentation in CHANGELOG.md and a version bump.

// Allow test-specific patterns
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::uninlined_format_args)]

use approx::assert_relative_eq;
use mesh::{io, prelude::*, pricing, transform, types};

fn flat_cuboid(l: f64, w: f64, h: f64) -> TriangleMesh {
    transform::expand_indexed(&types::cuboid(l, w, h)).unwrap()
}

/// Same box, but every face split along the other diagonal.
fn flat_cuboid_other_diagonal(l: f64, w: f64, h: f64) -> TriangleMesh {
    let cube = types::cuboid(l, w, h);
    let mut out = TriangleMesh::new();
    let p = |i: u32| cube.positions[i as usize];
    for pair in cube.faces.chunks(2) {
        let (t0, t1) = (pair[0], pair[1]);
        // Each face is two triangles sharing a diagonal; split on the other one
        let k = (0..3).find(|&k| !t1.contains(&t0[k])).unwrap();
        let (u0, s1, s2) = (t0[k], t0[(k + 1) % 3], t0[(k + 2) % 3]);
        let u1 = *t1.iter().find(|v| !t0.contains(v)).unwrap();
        out.push_triangle(&Triangle::new(p(u0), p(s1), p(u1)));
        out.push_triangle(&Triangle::new(p(u0), p(u1), p(s2)));
    }
    out
}

// =============================================================================
// TIER 1: Measurement
// =============================================================================

mod tier1_measurement {
    use super::*;

    #[test]
    fn closed_cuboid_volume_and_area() {
        let (l, w, h) = (30.0, 20.0, 15.0);
        let stats = analyze(&flat_cuboid(l, w, h));

        assert_relative_eq!(stats.volume_cm3, l * w * h / 1000.0, epsilon = 1e-9);
        assert_relative_eq!(
            stats.surface_area_cm2,
            2.0 * (l * w + l * h + w * h) / 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn cuboid_translation_invariance() {
        let moved = transform::Transform3D::translation(-75.0, 120.0, 33.0)
            .apply_to_mesh(&types::cuboid(30.0, 20.0, 15.0));
        let stats = analyze(&transform::expand_indexed(&moved).unwrap());

        // 30 x 20 x 15 mm: 2 * (600 + 450 + 300) mm² = 27 cm²
        assert_relative_eq!(stats.volume_cm3, 9.0, epsilon = 1e-9);
        assert_relative_eq!(stats.surface_area_cm2, 27.0, epsilon = 1e-9);
    }

    #[test]
    fn diagonal_split_does_not_matter() {
        let a = analyze(&flat_cuboid(30.0, 20.0, 15.0));
        let b = analyze(&flat_cuboid_other_diagonal(30.0, 20.0, 15.0));

        assert_eq!(a.polygons, b.polygons);
        assert_relative_eq!(a.volume_cm3, b.volume_cm3, epsilon = 1e-9);
        assert_relative_eq!(a.surface_area_cm2, b.surface_area_cm2, epsilon = 1e-9);
    }

    #[test]
    fn triangle_order_does_not_matter() {
        let mesh = flat_cuboid(12.0, 34.0, 56.0);
        let reversed = TriangleMesh::from_triangles(
            mesh.triangles().collect::<Vec<_>>().into_iter().rev(),
        );

        let a = analyze(&mesh);
        let b = analyze(&reversed);

        assert_relative_eq!(a.volume_cm3, b.volume_cm3, epsilon = 1e-9);
        assert_relative_eq!(a.surface_area_cm2, b.surface_area_cm2, epsilon = 1e-9);
        assert_eq!(a.dimensions_cm, b.dimensions_cm);
        assert_relative_eq!(a.bbox_volume_cm3, b.bbox_volume_cm3);
    }

    #[test]
    fn empty_mesh_is_all_zero() {
        let stats = analyze(&TriangleMesh::new());
        assert_eq!(stats, ModelStatistics::default());
        assert_eq!(stats.polygons, 0);
        assert_relative_eq!(stats.dimensions_cm.x, 0.0);
    }
}

// =============================================================================
// TIER 2: Formats
// =============================================================================

mod tier2_formats {
    use super::*;

    #[test]
    fn binary_stl_cube_end_to_end() {
        let bytes = io::encode_stl_binary(&flat_cuboid(10.0, 10.0, 10.0));
        let mesh = parse_upload("cube.stl", &bytes).unwrap();
        let stats = analyze(&mesh);

        assert_eq!(stats.polygons, 12);
        assert_relative_eq!(stats.dimensions_cm.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(stats.dimensions_cm.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(stats.dimensions_cm.z, 1.0, epsilon = 1e-6);
        assert_relative_eq!(stats.bbox_volume_cm3, 1.0, epsilon = 1e-6);
        assert_relative_eq!(stats.volume_cm3, 1.0, epsilon = 1e-6);
        assert_relative_eq!(stats.surface_area_cm2, 6.0, epsilon = 1e-6);
    }

    #[test]
    fn obj_quads_and_negative_indices() {
        let obj = "\
o base
v 0 0 0
v 10 0 0
v 10 10 0
v 0 10 0
v 0 0 10
v 10 0 10
v 10 10 10
v 0 10 10
f -8 -5 -6 -7
f 5 6 7 8
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
";
        let stats = analyze(&parse_mesh(obj.as_bytes(), MeshFormat::Obj).unwrap());

        assert_eq!(stats.polygons, 12);
        assert_relative_eq!(stats.volume_cm3, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn rejected_files() {
        let err = parse_upload("model.gltf", b"{}").unwrap_err();
        assert!(matches!(err, io::IoError::UnsupportedFormat { .. }));

        let err = parse_upload("model.stl", &[0u8; 20]).unwrap_err();
        assert!(matches!(err, io::IoError::Parse { .. }));

        let err = parse_upload("model.obj", b"# only a comment\n").unwrap_err();
        assert!(matches!(err, io::IoError::EmptyModel));
    }
}

// =============================================================================
// TIER 3: Pricing
// =============================================================================

mod tier3_pricing {
    use super::*;

    #[test]
    fn shell_correction_hundred_mm_cube() {
        let stats = analyze(&flat_cuboid(100.0, 100.0, 100.0));
        let config = ShellCorrectionConfig::default()
            .with_wall_thickness(2.0)
            .with_bottom_thickness(2.0);

        let effective = pricing::effective_volume_cm3(&stats, &config);
        assert_relative_eq!(effective, 96.832, epsilon = 1e-6);

        // Displayed statistics are not touched by the correction
        assert_relative_eq!(stats.volume_cm3, 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn price_is_volume_times_density_times_rate() {
        let catalog = MaterialCatalog::new(
            "AUD",
            vec![pricing::MaterialProfile::new(
                "generic", "Generic", 1.24, 0.55, 0.75,
            )],
        )
        .unwrap();
        let settings = PrintSettings::default()
            .with_material("generic")
            .with_shell(ShellCorrectionConfig::disabled());
        let stats = ModelStatistics {
            volume_cm3: 10.0,
            ..ModelStatistics::default()
        };

        let quote = estimate(Some(&stats), &settings, &catalog).unwrap();
        let quote = quote.quote().unwrap();

        assert_relative_eq!(quote.weight_g, 12.4, epsilon = 1e-9);
        assert_relative_eq!(quote.total, 6.82, epsilon = 1e-9);
        assert_relative_eq!(quote.density_g_cm3, 1.24);
        assert_relative_eq!(quote.price_per_gram, 0.55);
    }

    #[test]
    fn unmeasured_model_is_not_computable() {
        let estimate = estimate(
            None,
            &PrintSettings::default(),
            &MaterialCatalog::default(),
        )
        .unwrap();
        assert_eq!(estimate, PriceEstimate::NotComputable);
    }
}

// =============================================================================
// TIER 4: Sessions
// =============================================================================

mod tier4_sessions {
    use super::*;
    use mesh::ingest::UploadOutcome;

    #[tokio::test]
    async fn newer_file_wins() {
        let session = UploadSession::new();
        let big = io::encode_stl_binary(&flat_cuboid(50.0, 50.0, 50.0));
        let small = io::encode_stl_binary(&flat_cuboid(10.0, 10.0, 10.0));

        let first = session.begin_upload("big.stl").unwrap();
        let second = session.begin_upload("small.stl").unwrap();

        // The second upload resolves first, the first one after it
        let second = session.read_and_finish(second, &small[..]).await;
        let first = session.read_and_finish(first, &big[..]).await;

        assert!(matches!(second, UploadOutcome::Analyzed(_)));
        assert!(matches!(first, UploadOutcome::Superseded));
        assert_relative_eq!(session.statistics().unwrap().volume_cm3, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn failed_upload_shows_no_statistics() {
        let session = UploadSession::new();
        let ticket = session.begin_upload("cube.stl").unwrap();
        session.finish_upload(ticket, b"not an stl");

        assert!(matches!(session.state(), IngestState::ParseFailed { .. }));
        assert!(session.statistics().is_none());
    }
}
