//! End-to-end merges through the in-memory host.

use glam::DVec3;
use proptest::prelude::*;
use skin_merge::{
    InfluenceWeight, MemoryHost, MemoryHostError, MergeMode, MergeSettings, MeshId, merge,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn ids(names: &[&str]) -> Vec<MeshId> {
    names.iter().map(|&n| MeshId::from(n)).collect()
}

fn flattened() -> MergeSettings {
    MergeSettings {
        mode: MergeMode::Flattened,
        ..MergeSettings::default()
    }
}

/// Two base meshes that both cover the origin, plus a hair mesh with one
/// vertex at the origin and one far away.
fn overlapping_scene() -> MemoryHost {
    let mut host = MemoryHost::new();
    host.add_mesh("a", [DVec3::new(0.0, 0.0, 0.0002)]);
    host.bind("a", "a_skin", ["jointA"]).expect("bind a");
    host.set_weights("a", 0, [("jointA", 1.0)]).expect("weights a");

    host.add_mesh("b", [DVec3::new(0.0, 0.0, 0.0008)]);
    host.bind("b", "b_skin", ["jointB"]).expect("bind b");
    host.set_weights("b", 0, [("jointB", 1.0)]).expect("weights b");

    host.add_mesh("hair", [DVec3::ZERO, DVec3::splat(10.0)]);
    host.bind("hair", "hair_skin", ["jointA", "jointB", "root"])
        .expect("bind hair");
    host.set_weights("hair", 0, [("root", 1.0)]).expect("weights hair 0");
    host.set_weights("hair", 1, [("root", 1.0)]).expect("weights hair 1");
    host
}

#[test]
fn unbound_output_is_a_no_op() {
    init_tracing();
    let mut host = MemoryHost::new();
    host.add_mesh("hair", [DVec3::ZERO]);
    host.add_mesh("body", [DVec3::ZERO]);
    host.bind("body", "body_skin", ["jointA"]).expect("bind");
    host.set_weights("body", 0, [("jointA", 1.0)]).expect("weights");

    let report = merge(
        &mut host,
        &ids(&["body"]),
        &MeshId::from("hair"),
        &MergeSettings::default(),
    )
    .expect("merge");

    assert!(!report.output_bound);
    assert_eq!(report.applied(), 0);
    assert!(report.bases.is_empty());
}

#[test]
fn unbound_output_still_reads_every_base() {
    init_tracing();
    let mut host = MemoryHost::new();
    host.add_mesh("hair", [DVec3::ZERO]);
    host.add_mesh("prop", [DVec3::ZERO]);

    let err = merge(
        &mut host,
        &ids(&["prop", "ghost"]),
        &MeshId::from("hair"),
        &MergeSettings::default(),
    )
    .expect_err("ghost does not exist");
    assert_eq!(err.mesh().as_str(), "ghost");
    assert_eq!(
        err.host_error(),
        &MemoryHostError::UnknownMesh(MeshId::from("ghost"))
    );

    let report = merge(
        &mut host,
        &ids(&["prop"]),
        &MeshId::from("hair"),
        &MergeSettings::default(),
    )
    .expect("merge");
    assert!(!report.output_bound);
    assert_eq!(report.unbound_bases, ids(&["prop"]));
}

#[test]
fn close_vertex_receives_base_weights() {
    init_tracing();
    let mut host = MemoryHost::new();
    host.add_mesh("base", [DVec3::ZERO]);
    host.bind("base", "base_skin", ["jointA"]).expect("bind base");
    host.set_weights("base", 0, [("jointA", 1.0)]).expect("weights");
    host.add_mesh("hair", [DVec3::new(0.0, 0.0, 0.0005)]);
    host.bind("hair", "hair_skin", ["jointA"]).expect("bind hair");

    let report = merge(
        &mut host,
        &ids(&["base"]),
        &MeshId::from("hair"),
        &MergeSettings::default(),
    )
    .expect("merge");

    assert!(report.is_clean());
    assert_eq!(report.applied(), 1);
    assert_eq!(
        host.weights("hair", 0).expect("weights"),
        &[InfluenceWeight::new("jointA", 1.0)]
    );
}

#[test]
fn far_vertex_is_left_alone() {
    init_tracing();
    let mut host = MemoryHost::new();
    host.add_mesh("base", [DVec3::new(1.0, 1.0, 6.0)]);
    host.bind("base", "base_skin", ["jointA"]).expect("bind base");
    host.set_weights("base", 0, [("jointA", 1.0)]).expect("weights");
    host.add_mesh("hair", [DVec3::ONE]);
    host.bind("hair", "hair_skin", ["jointA", "root"])
        .expect("bind hair");
    host.set_weights("hair", 0, [("root", 1.0)]).expect("weights");

    let report = merge(
        &mut host,
        &ids(&["base"]),
        &MeshId::from("hair"),
        &MergeSettings::default(),
    )
    .expect("merge");

    assert_eq!(report.matched(), 0);
    assert_eq!(
        host.weights("hair", 0).expect("weights"),
        &[InfluenceWeight::new("root", 1.0)]
    );
}

#[test]
fn sequential_last_base_wins() {
    init_tracing();
    let mut host = overlapping_scene();

    let report = merge(
        &mut host,
        &ids(&["a", "b"]),
        &MeshId::from("hair"),
        &MergeSettings::default(),
    )
    .expect("merge");

    // Both bases claim vertex 0; b is processed last.
    assert_eq!(report.applied(), 2);
    assert_eq!(
        host.weights("hair", 0).expect("weights"),
        &[InfluenceWeight::new("jointB", 1.0)]
    );
    assert_eq!(
        host.weights("hair", 1).expect("weights"),
        &[InfluenceWeight::new("root", 1.0)]
    );
}

#[test]
fn sequential_order_decides_the_winner() {
    init_tracing();
    let mut host = overlapping_scene();

    merge(
        &mut host,
        &ids(&["b", "a"]),
        &MeshId::from("hair"),
        &MergeSettings::default(),
    )
    .expect("merge");

    assert_eq!(
        host.weights("hair", 0).expect("weights"),
        &[InfluenceWeight::new("jointA", 1.0)]
    );
}

#[test]
fn flattened_takes_globally_nearest() {
    init_tracing();
    let mut host = overlapping_scene();

    let report = merge(
        &mut host,
        &ids(&["a", "b"]),
        &MeshId::from("hair"),
        &flattened(),
    )
    .expect("merge");

    // a's vertex is closer to the origin than b's.
    assert_eq!(report.applied(), 1);
    assert_eq!(report.bases[0].applied, 1);
    assert_eq!(report.bases[1].matched, 0);
    assert_eq!(
        host.weights("hair", 0).expect("weights"),
        &[InfluenceWeight::new("jointA", 1.0)]
    );
}

#[test]
fn flattened_tie_goes_to_first_base() {
    init_tracing();
    let mut host = MemoryHost::new();
    for (name, joint) in [("a", "jointA"), ("b", "jointB")] {
        host.add_mesh(name, [DVec3::ZERO]);
        host.bind(name, format!("{name}_skin"), [joint]).expect("bind");
        host.set_weights(name, 0, [(joint, 1.0)]).expect("weights");
    }
    host.add_mesh("hair", [DVec3::ZERO]);
    host.bind("hair", "hair_skin", ["jointA", "jointB"])
        .expect("bind hair");

    merge(
        &mut host,
        &ids(&["b", "a"]),
        &MeshId::from("hair"),
        &flattened(),
    )
    .expect("merge");

    assert_eq!(
        host.weights("hair", 0).expect("weights"),
        &[InfluenceWeight::new("jointB", 1.0)]
    );
}

#[test]
fn unbound_base_is_skipped() {
    init_tracing();
    let mut host = overlapping_scene();
    host.add_mesh("prop", [DVec3::ZERO]);

    let report = merge(
        &mut host,
        &ids(&["prop", "a"]),
        &MeshId::from("hair"),
        &MergeSettings::default(),
    )
    .expect("merge");

    assert_eq!(report.unbound_bases, ids(&["prop"]));
    assert_eq!(report.bases.len(), 1);
    assert_eq!(
        host.weights("hair", 0).expect("weights"),
        &[InfluenceWeight::new("jointA", 1.0)]
    );
}

#[test]
fn missing_mesh_aborts_with_host_error() {
    init_tracing();
    let mut host = overlapping_scene();

    let err = merge(
        &mut host,
        &ids(&["a", "ghost"]),
        &MeshId::from("hair"),
        &MergeSettings::default(),
    )
    .expect_err("ghost does not exist");

    assert_eq!(err.mesh().as_str(), "ghost");
    assert_eq!(
        err.host_error(),
        &MemoryHostError::UnknownMesh(MeshId::from("ghost"))
    );
    assert!(err.to_string().contains("no mesh named `ghost`"));
}

#[test]
fn rejected_writes_are_reported() {
    init_tracing();
    let mut host = overlapping_scene();
    // Rebinding without jointB makes b's writes fail.
    host.bind("hair", "hair_skin", ["jointA", "root"])
        .expect("rebind hair");

    let report = merge(
        &mut host,
        &ids(&["a", "b"]),
        &MeshId::from("hair"),
        &MergeSettings::default(),
    )
    .expect("merge");

    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.base.as_str(), "b");
    assert_eq!(failure.vertex.as_str(), "hair.vtx[0]");
    assert!(failure.reason.contains("jointB"));
    // The earlier write from a survives.
    assert_eq!(
        host.weights("hair", 0).expect("weights"),
        &[InfluenceWeight::new("jointA", 1.0)]
    );
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_matches_serial() {
    init_tracing();
    let mut serial = overlapping_scene();
    let mut parallel = overlapping_scene();
    let bases = ids(&["a", "b"]);
    let output = MeshId::from("hair");

    let serial_report =
        merge(&mut serial, &bases, &output, &MergeSettings::default()).expect("serial");
    let parallel_report = merge(
        &mut parallel,
        &bases,
        &output,
        &MergeSettings {
            parallel: true,
            ..MergeSettings::default()
        },
    )
    .expect("parallel");

    assert_eq!(serial_report, parallel_report);
    for index in 0..2 {
        assert_eq!(
            serial.weights("hair", index).expect("serial"),
            parallel.weights("hair", index).expect("parallel")
        );
    }
}

fn lattice_scene(a: &[(i8, i8)], b: &[(i8, i8)], hair: &[(i8, i8)]) -> MemoryHost {
    let to_positions = |points: &[(i8, i8)]| -> Vec<DVec3> {
        points
            .iter()
            .map(|&(x, y)| DVec3::new(f64::from(x), f64::from(y), 0.0) * 0.0004)
            .collect()
    };

    let mut host = MemoryHost::new();
    for (name, points, joint) in [("a", a, "jointA"), ("b", b, "jointB")] {
        host.add_mesh(name, to_positions(points));
        host.bind(name, format!("{name}_skin"), [joint]).expect("bind");
        for index in 0..points.len() {
            host.set_weights(name, index, [(joint, 1.0)]).expect("weights");
        }
    }
    host.add_mesh("hair", to_positions(hair));
    host.bind("hair", "hair_skin", ["jointA", "jointB"])
        .expect("bind hair");
    host
}

fn hair_weights(host: &MemoryHost, count: usize) -> Vec<Vec<InfluenceWeight>> {
    (0..count)
        .map(|i| host.weights("hair", i).expect("weights").to_vec())
        .collect()
}

fn points() -> impl Strategy<Value = Vec<(i8, i8)>> {
    prop::collection::vec((-4i8..4, -4i8..4), 0..16)
}

proptest! {
    #[test]
    fn merge_is_idempotent(a in points(), b in points(), hair in points(), flatten in any::<bool>()) {
        let settings = MergeSettings {
            mode: if flatten { MergeMode::Flattened } else { MergeMode::Sequential },
            ..MergeSettings::default()
        };
        let bases = ids(&["a", "b"]);
        let output = MeshId::from("hair");

        let mut once = lattice_scene(&a, &b, &hair);
        merge(&mut once, &bases, &output, &settings).expect("first");

        let mut twice = lattice_scene(&a, &b, &hair);
        merge(&mut twice, &bases, &output, &settings).expect("first");
        merge(&mut twice, &bases, &output, &settings).expect("second");

        prop_assert_eq!(hair_weights(&once, hair.len()), hair_weights(&twice, hair.len()));
    }

    #[test]
    fn sequential_claims_by_later_base_win(a in points(), b in points(), hair in points()) {
        let mut host = lattice_scene(&a, &b, &hair);
        merge(&mut host, &ids(&["a", "b"]), &MeshId::from("hair"), &MergeSettings::default())
            .expect("merge");

        let near = |points: &[(i8, i8)], target: (i8, i8)| {
            let target = DVec3::new(f64::from(target.0), f64::from(target.1), 0.0) * 0.0004;
            points.iter().any(|&(x, y)| {
                let p = DVec3::new(f64::from(x), f64::from(y), 0.0) * 0.0004;
                skin_merge::MATCH_THRESHOLD > p.distance(target)
            })
        };

        for (index, &point) in hair.iter().enumerate() {
            let weights = host.weights("hair", index).expect("weights").to_vec();
            let expected = if near(&b, point) {
                vec![InfluenceWeight::new("jointB", 1.0)]
            } else if near(&a, point) {
                vec![InfluenceWeight::new("jointA", 1.0)]
            } else {
                Vec::new()
            };
            prop_assert_eq!(weights, expected);
        }
    }
}
