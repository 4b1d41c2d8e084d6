use super::*;
use crate::schedule::model::PredefinedType;

fn task(kind: &str) -> Task {
    Task::new("t", PredefinedType::new(kind))
}

fn store_with(group: &str, names: &[&str]) -> ProfileStore {
    let mut store = ProfileStore::new();
    for name in names {
        store.upsert(group, AppearanceProfile::named(*name)).unwrap();
    }
    store
}

fn stack(group: &str) -> GroupStack {
    let mut s = GroupStack::new();
    s.push(group, true);
    s
}

#[test]
fn active_group_skips_disabled_entries() {
    let mut s = GroupStack::new();
    s.push("first", false);
    s.push("", true);
    s.push("second", true);
    assert_eq!(s.active_group(), "second");

    assert_eq!(GroupStack::new().active_group(), DEFAULT_GROUP);
}

#[test]
fn task_choice_wins_over_type_match() {
    let mut store = store_with("g", &["CONSTRUCTION", "special"]);
    store
        .upsert(DEFAULT_GROUP, AppearanceProfile::named("CONSTRUCTION"))
        .unwrap();
    let mut t = task("CONSTRUCTION");
    t.profile_choices.insert("g".to_string(), "special".to_string());

    let resolved = resolve(&t, &stack("g"), &store);
    assert_eq!(resolved.source, ResolutionSource::TaskChoice);
    assert_eq!(resolved.profile.name, "special");
}

#[test]
fn missing_choice_falls_through_to_group_type() {
    let store = store_with("g", &["CONSTRUCTION"]);
    let mut t = task("CONSTRUCTION");
    // Recorded choice points at a profile that no longer exists.
    t.profile_choices.insert("g".to_string(), "gone".to_string());

    let resolved = resolve(&t, &stack("g"), &store);
    assert_eq!(resolved.source, ResolutionSource::ActiveGroupType);
    assert_eq!(resolved.profile.name, "CONSTRUCTION");
}

#[test]
fn default_group_backs_missing_active_group() {
    let mut store = ProfileStore::new();
    store.ensure_default_group([&PredefinedType::new("CONSTRUCTION")]);

    let resolved = resolve(&task("CONSTRUCTION"), &stack("empty-group"), &store);
    assert_eq!(resolved.source, ResolutionSource::DefaultGroupType);
    assert_eq!(resolved.profile.name, "CONSTRUCTION");
}

#[test]
fn palette_stands_in_for_unsynthesized_default_group() {
    let store = ProfileStore::new();
    let resolved = resolve(&task("DEMOLITION"), &stack("g"), &store);
    assert_eq!(resolved.source, ResolutionSource::DefaultGroupType);
    assert!(resolved.profile.hide_at_end);
    assert_eq!(resolved.profile.in_progress_color, [1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn resolution_never_comes_back_empty() {
    let store = ProfileStore::new();
    let resolved = resolve(&task("SOMETHING_ODD"), &GroupStack::new(), &store);
    assert_eq!(resolved.source, ResolutionSource::Synthesized);
    assert_eq!(resolved.profile.name, "SOMETHING_ODD");
}

#[test]
fn static_start_mode_detected_on_resolved_profile() {
    let mut reference = AppearanceProfile::named("CONSTRUCTION");
    reference.consider_active = false;
    reference.consider_end = false;
    let mut store = ProfileStore::new();
    store.upsert("g", reference).unwrap();

    let resolved = resolve(&task("CONSTRUCTION"), &stack("g"), &store);
    assert_eq!(resolved.phase_mode(), PhaseMode::StaticStart);
}
