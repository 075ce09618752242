use kestrel_animation_core::{
    AnimJob, AnimJobId, AnimManager, ClipSetup, Config, CurveFormat, CurveSetup, Handle,
    InstanceSetup, LibrarySetup, Locator,
};

/// One scalar clip with two keyframe rows, plus a pair of all-static clips
/// for mixing checks.
fn scalar_setup() -> LibrarySetup {
    LibrarySetup {
        locator: Locator::shared("scalars"),
        curve_layout: vec![CurveFormat::Float],
        clips: vec![
            ClipSetup {
                name: "ramp".into(),
                length: 2,
                key_duration: 0.5,
                curves: vec![CurveSetup::animated([0.0, 0.0, 0.0, 0.0])],
            },
            ClipSetup {
                name: "two".into(),
                length: 1,
                key_duration: 1.0,
                curves: vec![CurveSetup::fixed([2.0, 0.0, 0.0, 0.0])],
            },
            ClipSetup {
                name: "ten".into(),
                length: 1,
                key_duration: 1.0,
                curves: vec![CurveSetup::fixed([10.0, 0.0, 0.0, 0.0])],
            },
        ],
    }
}

fn setup_instance(config: Config) -> (AnimManager, Handle) {
    let mut mgr = AnimManager::new(config);
    let lib = mgr.create_library(&scalar_setup()).unwrap();
    let inst = mgr.create_instance(&InstanceSetup::from_library(lib)).unwrap();
    (mgr, inst)
}

fn eval_sample(mgr: &mut AnimManager, inst: Handle, dt: f64) -> f32 {
    mgr.new_frame();
    assert!(mgr.add_active_instance(inst));
    mgr.evaluate(dt);
    mgr.samples(inst).expect("active instance has samples")[0]
}

/// it should hand out strictly increasing job ids, never the invalid zero
#[test]
fn job_ids_monotonic() {
    let (mut mgr, inst) = setup_instance(Config::default());
    let mut last = AnimJobId::INVALID;
    for _ in 0..8 {
        let id = mgr.play(inst, &AnimJob::default());
        assert!(id.is_valid());
        assert!(id > last);
        mgr.stop(inst, id, false);
        last = id;
    }
}

/// it should reject jobs beyond the per-instance capacity
#[test]
fn job_capacity_rejection() {
    let (mut mgr, inst) = setup_instance(Config {
        max_num_jobs_per_instance: 2,
        ..Default::default()
    });
    assert!(mgr.play(inst, &AnimJob::default()).is_valid());
    assert!(mgr.play(inst, &AnimJob::default()).is_valid());
    assert_eq!(mgr.play(inst, &AnimJob::default()), AnimJobId::INVALID);
    assert_eq!(mgr.lookup_instance(inst).unwrap().sequencer.num_jobs(), 2);

    // freeing a slot lets the next play succeed with a fresh id
    mgr.stop_all(inst, false);
    let id = mgr.play(inst, &AnimJob::default());
    assert_eq!(id, AnimJobId(4));
}

/// it should sample the clip's keys at the frame clock and loop at the clip end
#[test]
fn evaluate_samples_keys() {
    let (mut mgr, inst) = setup_instance(Config::default());

    // overwrite the ramp clip's two rows with 0 and 10
    let lib = mgr.lookup_locator(&Locator::shared("scalars")).unwrap();
    let floats = [0.0f32, 10.0];
    mgr.write_keys(lib, bytemuck::cast_slice(&floats)).unwrap();

    let id = mgr.play(inst, &AnimJob::default());
    assert!(id.is_valid());

    assert_eq!(eval_sample(&mut mgr, inst, 0.25), 0.0, "row 0 at t=0");
    assert_eq!(eval_sample(&mut mgr, inst, 0.25), 5.0, "halfway into row 0");
    assert_eq!(eval_sample(&mut mgr, inst, 0.25), 10.0, "row 1 at t=0.5");
    // past the last row the clip wraps back toward row 0
    assert_eq!(eval_sample(&mut mgr, inst, 0.25), 5.0, "wrap toward row 0");
}

/// it should mix tracks in ascending order by the job's weight
#[test]
fn track_mixing_order() {
    let (mut mgr, inst) = setup_instance(Config::default());
    let base = AnimJob {
        clip_index: 1, // "two"
        track_index: 0,
        ..Default::default()
    };
    let overlay = AnimJob {
        clip_index: 2, // "ten"
        track_index: 1,
        mix_weight: 0.5,
        ..Default::default()
    };
    assert!(mgr.play(inst, &base).is_valid());
    assert!(mgr.play(inst, &overlay).is_valid());

    // base writes 2.0, overlay lerps halfway toward 10.0
    assert_eq!(eval_sample(&mut mgr, inst, 0.016), 6.0);
}

/// it should fade a stopped job out and garbage-collect it afterwards
#[test]
fn stop_with_fade_out_decays() {
    let (mut mgr, inst) = setup_instance(Config::default());
    let job = AnimJob {
        clip_index: 1, // constant 2.0
        fade_out: 0.5,
        ..Default::default()
    };
    let id = mgr.play(inst, &job);
    assert_eq!(eval_sample(&mut mgr, inst, 0.25), 2.0);

    // stop at t=0.25; half a second of fade-out remains
    mgr.stop(inst, id, true);
    assert_eq!(mgr.lookup_instance(inst).unwrap().sequencer.num_jobs(), 1);

    // at t=0.5 the weight is half gone
    assert_eq!(eval_sample(&mut mgr, inst, 0.25), 1.0);
    // at t=0.75 the job is fully decayed and collected by evaluate
    assert_eq!(eval_sample(&mut mgr, inst, 0.25), 0.0);
    assert_eq!(mgr.lookup_instance(inst).unwrap().sequencer.num_jobs(), 0);
}

/// it should silence the samples after a hard stop
#[test]
fn hard_stop_silences() {
    let (mut mgr, inst) = setup_instance(Config::default());
    let id = mgr.play(
        inst,
        &AnimJob {
            clip_index: 1,
            ..Default::default()
        },
    );
    assert_eq!(eval_sample(&mut mgr, inst, 0.016), 2.0);
    mgr.stop(inst, id, false);
    assert_eq!(eval_sample(&mut mgr, inst, 0.016), 0.0);
}

/// it should stop whole tracks and all jobs through the manager
#[test]
fn stop_track_and_all() {
    let (mut mgr, inst) = setup_instance(Config::default());
    let track0 = AnimJob {
        clip_index: 1,
        track_index: 0,
        ..Default::default()
    };
    let track1 = AnimJob {
        clip_index: 2,
        track_index: 1,
        ..Default::default()
    };
    mgr.play(inst, &track0);
    mgr.play(inst, &track1);
    mgr.play(inst, &track1);
    assert_eq!(mgr.lookup_instance(inst).unwrap().sequencer.num_jobs(), 3);

    mgr.stop_track(inst, 1, false);
    assert_eq!(mgr.lookup_instance(inst).unwrap().sequencer.num_jobs(), 1);

    mgr.stop_all(inst, false);
    assert_eq!(mgr.lookup_instance(inst).unwrap().sequencer.num_jobs(), 0);
}

/// it should produce identical samples for identical call sequences
#[test]
fn evaluation_is_deterministic() {
    let run = || {
        let (mut mgr, inst) = setup_instance(Config::default());
        mgr.play(
            inst,
            &AnimJob {
                clip_index: 0,
                fade_in: 0.1,
                ..Default::default()
            },
        );
        mgr.play(
            inst,
            &AnimJob {
                clip_index: 2,
                track_index: 3,
                mix_weight: 0.25,
                ..Default::default()
            },
        );
        let mut trace = Vec::new();
        for _ in 0..6 {
            trace.push(eval_sample(&mut mgr, inst, 1.0 / 60.0).to_bits());
        }
        trace
    };
    assert_eq!(run(), run());
}
