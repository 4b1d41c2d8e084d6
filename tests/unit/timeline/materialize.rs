use super::*;
use crate::foundation::date::parse_isodatetime;
use crate::schedule::model::{PredefinedType, Task};
use crate::timeline::compiler::compute_timeline;

fn dt(s: &str) -> chrono::NaiveDateTime {
    parse_isodatetime(s).unwrap()
}

fn window() -> VizWindow {
    // Ten days over 100 frames: frame range [0, 100].
    VizWindow::new(dt("2024-01-01"), dt("2024-01-11"), 0, 100).unwrap()
}

fn dated_task(kind: &str, start: &str, finish: &str, outputs: &[u64], inputs: &[u64]) -> Task {
    let mut task = Task::new(kind, PredefinedType::new(kind));
    task.start = Some(dt(start));
    task.finish = Some(dt(finish));
    task.outputs = outputs.iter().map(|&id| ElementId(id)).collect();
    task.inputs = inputs.iter().map(|&id| ElementId(id)).collect();
    task
}

fn run(
    schedule: &Schedule,
    store: &ProfileStore,
    stack: &GroupStack,
    original_colors: &BTreeMap<ElementId, ColorRgba>,
) -> ElementTracks {
    let window = window();
    let timeline = compute_timeline(schedule, &window, store, stack);
    materialize(&timeline, schedule, store, stack, &window, original_colors)
}

fn store_with(profile: AppearanceProfile) -> (ProfileStore, GroupStack) {
    let mut store = ProfileStore::new();
    store.upsert("g", profile).unwrap();
    let mut stack = GroupStack::new();
    stack.push("g", true);
    (store, stack)
}

#[test]
fn skipped_start_phase_hides_outputs_through_before_start() {
    let mut profile = AppearanceProfile::named("CONSTRUCTION");
    profile.consider_start = false;
    let (store, stack) = store_with(profile);

    let mut schedule = Schedule::new();
    // Active span is [30, 70]; before_start is [0, 29].
    schedule.add_root_task(dated_task(
        "CONSTRUCTION",
        "2024-01-04",
        "2024-01-08",
        &[1],
        &[],
    ));

    let tracks = run(&schedule, &store, &stack, &BTreeMap::new());
    let track = &tracks[&ElementId(1)];
    for frame in [0, 15, 29] {
        assert!(!track.sample(frame).visible, "frame {frame}");
    }
    assert!(track.sample(30).visible);
}

#[test]
fn skipped_start_phase_leaves_inputs_visible() {
    let mut profile = AppearanceProfile::named("DEMOLITION");
    profile.consider_start = false;
    profile.hide_at_end = true;
    let (store, stack) = store_with(profile);

    let mut schedule = Schedule::new();
    schedule.add_root_task(dated_task(
        "DEMOLITION",
        "2024-01-04",
        "2024-01-08",
        &[],
        &[2],
    ));

    let tracks = run(&schedule, &store, &stack, &BTreeMap::new());
    let track = &tracks[&ElementId(2)];
    assert!(track.sample(0).visible);
    assert!(track.sample(29).visible);
    assert!(track.sample(50).visible);
}

#[test]
fn hide_at_end_is_terminal_even_when_end_is_not_considered() {
    let mut profile = AppearanceProfile::named("DEMOLITION");
    profile.consider_end = false;
    profile.hide_at_end = true;
    let (store, stack) = store_with(profile);

    let mut schedule = Schedule::new();
    // Active span is [30, 70]; after_end starts at 71.
    schedule.add_root_task(dated_task(
        "DEMOLITION",
        "2024-01-04",
        "2024-01-08",
        &[],
        &[3],
    ));

    let tracks = run(&schedule, &store, &stack, &BTreeMap::new());
    let track = &tracks[&ElementId(3)];
    assert!(track.sample(70).visible);
    assert!(!track.sample(71).visible);
    assert!(!track.sample(100).visible);
}

#[test]
fn skipped_active_phase_holds_the_start_appearance() {
    let mut profile = AppearanceProfile::named("OPERATION");
    profile.consider_active = false;
    profile.use_start_original_color = false;
    profile.start_color = [0.2, 0.4, 0.6, 1.0];
    profile.use_end_original_color = false;
    profile.end_color = [0.9, 0.9, 0.9, 1.0];
    let (store, stack) = store_with(profile);

    let mut schedule = Schedule::new();
    schedule.add_root_task(dated_task(
        "OPERATION",
        "2024-01-04",
        "2024-01-08",
        &[4],
        &[],
    ));

    let tracks = run(&schedule, &store, &stack, &BTreeMap::new());
    let track = &tracks[&ElementId(4)];
    // Mid-active frames keep the before-start appearance.
    let mid = track.sample(50);
    assert!(mid.visible);
    assert_eq!(mid.color, [0.2, 0.4, 0.6, 1.0]);
    // The end phase still lands.
    assert_eq!(track.sample(71).color, [0.9, 0.9, 0.9, 1.0]);
}

#[test]
fn active_alpha_ramps_linearly_between_endpoints() {
    let mut profile = AppearanceProfile::named("CONSTRUCTION");
    profile.consider_start = false;
    profile.in_progress_color = [0.0, 1.0, 0.0, 1.0];
    profile.active_start_transparency = 0.0;
    profile.active_finish_transparency = 1.0;
    profile.active_transparency_interpol = AlphaInterp::Linear;
    let (store, stack) = store_with(profile);

    let mut schedule = Schedule::new();
    // Task spans the whole window: active is [0, 100].
    schedule.add_root_task(dated_task(
        "CONSTRUCTION",
        "2024-01-01",
        "2024-01-11",
        &[5],
        &[],
    ));

    let tracks = run(&schedule, &store, &stack, &BTreeMap::new());
    let track = &tracks[&ElementId(5)];
    assert_eq!(track.sample(0).color[3], 1.0);
    assert!((track.sample(50).color[3] - 0.5).abs() < 1e-6);
    assert_eq!(track.sample(100).color[3], 0.0);
    // RGB holds while alpha ramps.
    assert_eq!(track.sample(50).color[..3], [0.0, 1.0, 0.0]);
}

#[test]
fn active_alpha_step_holds_until_the_end() {
    let mut profile = AppearanceProfile::named("CONSTRUCTION");
    profile.consider_start = false;
    profile.active_start_transparency = 0.0;
    profile.active_finish_transparency = 1.0;
    profile.active_transparency_interpol = AlphaInterp::Step;
    let (store, stack) = store_with(profile);

    let mut schedule = Schedule::new();
    schedule.add_root_task(dated_task(
        "CONSTRUCTION",
        "2024-01-01",
        "2024-01-11",
        &[6],
        &[],
    ));

    let tracks = run(&schedule, &store, &stack, &BTreeMap::new());
    let track = &tracks[&ElementId(6)];
    assert_eq!(track.sample(50).color[3], 1.0);
    assert_eq!(track.sample(99).color[3], 1.0);
    assert_eq!(track.sample(100).color[3], 0.0);
}

#[test]
fn later_task_records_win_overlapping_frames() {
    let construction = palette_like("CONSTRUCTION", [0.0, 1.0, 0.0, 1.0]);
    let demolition = palette_like("DEMOLITION", [1.0, 0.0, 0.0, 1.0]);
    let mut store = ProfileStore::new();
    store.upsert("g", construction).unwrap();
    store.upsert("g", demolition).unwrap();
    let mut stack = GroupStack::new();
    stack.push("g", true);

    let mut schedule = Schedule::new();
    schedule.add_root_task(dated_task(
        "CONSTRUCTION",
        "2024-01-01",
        "2024-01-11",
        &[7],
        &[],
    ));
    schedule.add_root_task(dated_task(
        "DEMOLITION",
        "2024-01-01",
        "2024-01-11",
        &[],
        &[7],
    ));

    let tracks = run(&schedule, &store, &stack, &BTreeMap::new());
    // Both tasks wrote the active endpoints; the demolition record visited
    // last and owns the shared frames.
    assert_eq!(tracks[&ElementId(7)].sample(0).color, [1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn unscheduled_elements_are_hidden_for_the_whole_range() {
    let schedule = Schedule::new();
    let originals = BTreeMap::from([(ElementId(99), [0.5, 0.5, 0.5, 1.0])]);
    let tracks = run(&schedule, &ProfileStore::new(), &GroupStack::new(), &originals);
    let track = &tracks[&ElementId(99)];
    assert!(!track.sample(0).visible);
    assert!(!track.sample(100).visible);
}

#[test]
fn original_color_flags_read_from_the_model_color() {
    let mut profile = AppearanceProfile::named("RENOVATION");
    profile.use_start_original_color = true;
    profile.start_transparency = 0.25;
    let (store, stack) = store_with(profile);

    let mut schedule = Schedule::new();
    schedule.add_root_task(dated_task(
        "RENOVATION",
        "2024-01-04",
        "2024-01-08",
        &[8],
        &[],
    ));
    let originals = BTreeMap::from([(ElementId(8), [0.1, 0.2, 0.3, 1.0])]);

    let tracks = run(&schedule, &store, &stack, &originals);
    let sampled = tracks[&ElementId(8)].sample(10);
    assert!(sampled.visible);
    assert_eq!(sampled.color, [0.1, 0.2, 0.3, 0.75]);
}

#[test]
fn static_start_record_pins_start_appearance_everywhere() {
    let mut profile = AppearanceProfile::named("OPERATION");
    profile.consider_active = false;
    profile.consider_end = false;
    profile.start_color = [1.0, 1.0, 1.0, 1.0];
    let (store, stack) = store_with(profile);

    let mut schedule = Schedule::new();
    schedule.add_root_task(dated_task(
        "OPERATION",
        "2030-01-01",
        "2030-06-01",
        &[9],
        &[],
    ));

    let tracks = run(&schedule, &store, &stack, &BTreeMap::new());
    let track = &tracks[&ElementId(9)];
    for frame in [0, 50, 100] {
        let sampled = track.sample(frame);
        assert!(sampled.visible, "frame {frame}");
        assert_eq!(sampled.color, [1.0, 1.0, 1.0, 1.0]);
    }
}

fn palette_like(name: &str, active: ColorRgba) -> AppearanceProfile {
    let mut p = AppearanceProfile::named(name);
    p.in_progress_color = active;
    p.use_start_original_color = false;
    p.start_color = [1.0, 1.0, 1.0, 1.0];
    p
}
