use kestrel_animation_core::{
    AnimError, AnimManager, ClipSetup, Config, CurveFormat, CurveSetup, Handle, InstanceSetup,
    LibrarySetup, Locator,
};

fn frame_config() -> Config {
    Config {
        // room for exactly two active instances of the 9-stride library
        sample_pool_capacity: 18,
        ..Default::default()
    }
}

fn human_setup() -> LibrarySetup {
    LibrarySetup {
        locator: Locator::shared("human"),
        curve_layout: vec![CurveFormat::Float2, CurveFormat::Float3, CurveFormat::Float4],
        clips: vec![ClipSetup {
            name: "idle".into(),
            length: 10,
            key_duration: 0.04,
            curves: vec![
                CurveSetup::animated([1.0, 2.0, 0.0, 0.0]),
                CurveSetup::animated([5.0, 6.0, 7.0, 0.0]),
                CurveSetup::fixed([9.0, 10.0, 11.0, 12.0]),
            ],
        }],
    }
}

fn instance(mgr: &mut AnimManager) -> Handle {
    let lib = mgr.create_library(&human_setup()).unwrap();
    mgr.create_instance(&InstanceSetup::from_library(lib)).unwrap()
}

/// it should hand out disjoint sample slices and reject a third claim
#[test]
fn sample_pool_claims_are_disjoint() {
    let mut mgr = AnimManager::new(frame_config());
    let a = instance(&mut mgr);
    let lib = mgr.lookup_locator(&Locator::shared("human")).unwrap();
    let b = mgr.create_instance(&InstanceSetup::from_library(lib)).unwrap();
    let c = mgr.create_instance(&InstanceSetup::from_library(lib)).unwrap();

    mgr.new_frame();
    assert!(mgr.add_active_instance(a));
    assert!(mgr.add_active_instance(b));
    let inst_a = mgr.lookup_instance(a).unwrap();
    let inst_b = mgr.lookup_instance(b).unwrap();
    assert_eq!(inst_a.samples.offset, 0);
    assert_eq!(inst_a.samples.len, 9);
    assert_eq!(inst_b.samples.offset, 9);
    assert_eq!(inst_b.samples.len, 9);

    // third claim would overflow the sample pool; nothing changes
    assert!(!mgr.add_active_instance(c));
    assert_eq!(mgr.num_active_instances(), 2);
    assert_eq!(mgr.num_samples(), 18);
    assert!(mgr.lookup_instance(c).unwrap().samples.is_empty());

    mgr.evaluate(1.0 / 60.0);
    assert!((mgr.cur_time() - 1.0 / 60.0).abs() < 1e-12);
}

/// it should cap the active set independently of the sample pool
#[test]
fn active_set_capacity() {
    let mut mgr = AnimManager::new(Config {
        max_num_active_instances: 1,
        ..Default::default()
    });
    let a = instance(&mut mgr);
    let lib = mgr.lookup_locator(&Locator::shared("human")).unwrap();
    let b = mgr.create_instance(&InstanceSetup::from_library(lib)).unwrap();

    mgr.new_frame();
    assert!(mgr.add_active_instance(a));
    assert!(!mgr.add_active_instance(b));
    assert_eq!(mgr.num_active_instances(), 1);
    mgr.evaluate(0.0);
}

/// it should clear the previous frame's claims on new_frame
#[test]
fn new_frame_releases_claims() {
    let mut mgr = AnimManager::new(frame_config());
    let a = instance(&mut mgr);

    mgr.new_frame();
    assert!(mgr.add_active_instance(a));
    mgr.evaluate(0.016);
    assert!(!mgr.lookup_instance(a).unwrap().samples.is_empty());

    mgr.new_frame();
    assert!(mgr.lookup_instance(a).unwrap().samples.is_empty());
    assert_eq!(mgr.num_samples(), 0);
    assert_eq!(mgr.num_active_instances(), 0);
    mgr.evaluate(0.016);
}

/// it should advance the global clock monotonically across frames
#[test]
fn cur_time_monotonic() {
    let mut mgr = AnimManager::new(frame_config());
    let mut last = mgr.cur_time();
    for dt in [1.0 / 60.0, 0.0, 1.0 / 30.0, 0.25] {
        mgr.new_frame();
        mgr.evaluate(dt);
        assert!(mgr.cur_time() >= last);
        last = mgr.cur_time();
    }
    assert!((last - (1.0 / 60.0 + 1.0 / 30.0 + 0.25)).abs() < 1e-12);
}

/// it should refuse instance creation for unresolved handles
#[test]
fn instance_requires_live_library() {
    let mut mgr = AnimManager::new(frame_config());
    assert_eq!(
        mgr.create_instance(&InstanceSetup::from_library(Handle::INVALID)),
        Err(AnimError::UnknownLibrary)
    );

    let lib = mgr.create_library(&human_setup()).unwrap();
    assert_eq!(
        mgr.create_instance(&InstanceSetup::with_skeleton(lib, Handle::INVALID)),
        Err(AnimError::UnknownSkeleton)
    );
    assert_eq!(mgr.instance_pool_info().num_used_slots, 0);

    let inst = mgr.create_instance(&InstanceSetup::from_library(lib)).unwrap();
    assert!(mgr.lookup_instance(inst).is_some());
}

/// it should invalidate instance handles destroyed by their label
#[test]
fn destroy_label_frees_instances() {
    let mut mgr = AnimManager::new(frame_config());
    let lib = mgr.create_library(&human_setup()).unwrap();
    let label = mgr.push_label();
    let inst = mgr.create_instance(&InstanceSetup::from_library(lib)).unwrap();
    mgr.pop_label();

    mgr.destroy(label);
    assert!(mgr.lookup_instance(inst).is_none());
    assert_eq!(mgr.instance_pool_info().num_used_slots, 0);
    // the library was registered under a different label and survives
    assert!(mgr.lookup_library(lib).is_some());
}

/// it should treat a nested new_frame as a contract violation
#[test]
#[should_panic(expected = "new_frame inside a frame")]
fn new_frame_twice_panics() {
    let mut mgr = AnimManager::new(frame_config());
    mgr.new_frame();
    mgr.new_frame();
}

/// it should treat evaluate outside a frame as a contract violation
#[test]
#[should_panic(expected = "evaluate outside a frame")]
fn evaluate_outside_frame_panics() {
    let mut mgr = AnimManager::new(frame_config());
    mgr.evaluate(0.016);
}

/// it should treat add_active_instance outside a frame as a contract violation
#[test]
#[should_panic(expected = "add_active_instance outside a frame")]
fn add_active_outside_frame_panics() {
    let mut mgr = AnimManager::new(frame_config());
    let a = instance(&mut mgr);
    mgr.add_active_instance(a);
}
