use super::*;

fn profile(name: &str) -> AppearanceProfile {
    AppearanceProfile::named(name)
}

#[test]
fn upsert_then_get_round_trips() {
    let mut store = ProfileStore::new();
    let p = profile("CONSTRUCTION");
    store.upsert("phase-a", p.clone()).unwrap();
    assert_eq!(store.get("phase-a", "CONSTRUCTION"), Some(&p));
}

#[test]
fn upsert_replaces_by_name() {
    let mut store = ProfileStore::new();
    store.upsert("g", profile("X")).unwrap();
    let mut replacement = profile("X");
    replacement.hide_at_end = true;
    store.upsert("g", replacement).unwrap();

    assert_eq!(store.group("g").unwrap().profiles.len(), 1);
    assert!(store.get("g", "X").unwrap().hide_at_end);
}

#[test]
fn upsert_rejects_malformed_profiles() {
    let mut store = ProfileStore::new();
    let mut bad = profile("BAD");
    bad.start_color = [2.0, 0.0, 0.0, 1.0];
    assert!(store.upsert("g", bad).is_err());
    assert!(store.group("g").is_none());
    assert_eq!(store.version(), 0);
}

#[test]
fn version_increases_on_every_write() {
    let mut store = ProfileStore::new();
    assert_eq!(store.version(), 0);
    store.upsert("g", profile("A")).unwrap();
    store.upsert("g", profile("B")).unwrap();
    assert_eq!(store.version(), 2);
    store.remove_group("g").unwrap();
    assert_eq!(store.version(), 3);
}

#[test]
fn default_group_cannot_be_removed_or_renamed() {
    let mut store = ProfileStore::new();
    store.ensure_default_group([&PredefinedType::new("CONSTRUCTION")]);
    assert!(store.remove_group(DEFAULT_GROUP).is_err());
    assert!(store.rename_group(DEFAULT_GROUP, "other").is_err());
    assert!(store.rename_group("other", DEFAULT_GROUP).is_err());
    assert!(store.group(DEFAULT_GROUP).is_some());
}

#[test]
fn ensure_default_group_seeds_one_profile_per_seen_type() {
    let mut store = ProfileStore::new();
    let construction = PredefinedType::new("CONSTRUCTION");
    let demolition = PredefinedType::new("DEMOLITION");
    let survey = PredefinedType::new("SURVEY");
    store.ensure_default_group([&construction, &demolition, &construction, &survey]);

    let group = store.group(DEFAULT_GROUP).unwrap();
    assert_eq!(group.profiles.len(), 3);
    assert!(group.find("CONSTRUCTION").is_some());
    assert!(group.find("DEMOLITION").unwrap().hide_at_end);
    // Types outside the fixed palette still get a profile.
    assert!(group.find("SURVEY").is_some());

    // Second call is a no-op.
    let version = store.version();
    store.ensure_default_group([&construction]);
    assert_eq!(store.version(), version);
    assert_eq!(store.group(DEFAULT_GROUP).unwrap().profiles.len(), 3);
}

#[test]
fn rename_moves_group_contents() {
    let mut store = ProfileStore::new();
    store.upsert("old", profile("A")).unwrap();
    store.rename_group("old", "new").unwrap();
    assert!(store.group("old").is_none());
    assert!(store.get("new", "A").is_some());
    assert!(store.rename_group("missing", "x").is_err());
}

#[test]
fn json_document_round_trips() {
    let mut store = ProfileStore::new();
    store.ensure_default_group([&PredefinedType::new("CONSTRUCTION")]);
    store.upsert("phase-a", profile("CUSTOM")).unwrap();

    let raw = store.to_json().unwrap();
    let reloaded = ProfileStore::from_json(&raw).unwrap();
    assert_eq!(reloaded.list_groups(), vec![DEFAULT_GROUP, "phase-a"]);
    assert_eq!(
        reloaded.get("phase-a", "CUSTOM"),
        store.get("phase-a", "CUSTOM")
    );
    assert_eq!(
        reloaded.get(DEFAULT_GROUP, "CONSTRUCTION"),
        store.get(DEFAULT_GROUP, "CONSTRUCTION")
    );
}

#[test]
fn document_load_skips_malformed_profiles() {
    let raw = r#"{
        "g": {"profiles": [
            {"name": "OK"},
            {"name": "BAD_COLOR", "start_color": [9, 9, 9, 9]},
            {"name": 42},
            "not an object"
        ]}
    }"#;
    let store = ProfileStore::from_json(raw).unwrap();
    let group = store.group("g").unwrap();
    assert_eq!(group.profiles.len(), 1);
    assert_eq!(group.profiles[0].name, "OK");
}

#[test]
fn document_load_rejects_structural_garbage() {
    assert!(ProfileStore::from_json("[1, 2]").is_err());
    assert!(ProfileStore::from_json("not json").is_err());
}
