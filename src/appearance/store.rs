use std::collections::BTreeMap;

use crate::{
    appearance::profile::{AppearanceProfile, default_profile_for_type},
    foundation::error::{SitelapseError, SitelapseResult},
    schedule::model::PredefinedType,
};

/// Name of the reserved, auto-maintained profile group.
pub const DEFAULT_GROUP: &str = "DEFAULT";

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Named set of profiles with unique profile names.
pub struct ProfileGroup {
    /// Profiles in insertion order.
    pub profiles: Vec<AppearanceProfile>,
}

impl ProfileGroup {
    /// Find a profile by name.
    pub fn find(&self, name: &str) -> Option<&AppearanceProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }
}

#[derive(Clone, Debug, Default)]
/// Repository of profile groups backing resolution and persistence.
///
/// A single shared document keyed by group name, assuming one active editor;
/// concurrent writers must serialize externally. `version` increases on
/// every successful mutation as the hook for future conflict detection.
pub struct ProfileStore {
    groups: BTreeMap<String, ProfileGroup>,
    version: u64,
}

impl ProfileStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutation counter; increases on every successful write.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Look up a profile by group and name.
    pub fn get(&self, group: &str, name: &str) -> Option<&AppearanceProfile> {
        self.groups.get(group).and_then(|g| g.find(name))
    }

    /// The whole group, if present.
    pub fn group(&self, group: &str) -> Option<&ProfileGroup> {
        self.groups.get(group)
    }

    /// Group names in sorted order.
    pub fn list_groups(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Insert or replace `profile` in `group`, creating the group on first
    /// write. Malformed profiles are rejected and leave the store untouched.
    pub fn upsert(&mut self, group: &str, profile: AppearanceProfile) -> SitelapseResult<()> {
        if group.trim().is_empty() {
            return Err(SitelapseError::profile("group name must be non-empty"));
        }
        profile.validate()?;
        let entry = self.groups.entry(group.to_string()).or_default();
        match entry.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => entry.profiles.push(profile),
        }
        self.version += 1;
        Ok(())
    }

    /// Remove a group. The reserved default group cannot be removed.
    pub fn remove_group(&mut self, group: &str) -> SitelapseResult<()> {
        if group == DEFAULT_GROUP {
            return Err(SitelapseError::profile(
                "the DEFAULT group is reserved and cannot be removed",
            ));
        }
        if self.groups.remove(group).is_none() {
            return Err(SitelapseError::profile(format!("unknown group '{group}'")));
        }
        self.version += 1;
        Ok(())
    }

    /// Rename a group. The reserved default group cannot be renamed, nor can
    /// another group take its name.
    pub fn rename_group(&mut self, from: &str, to: &str) -> SitelapseResult<()> {
        if from == DEFAULT_GROUP || to == DEFAULT_GROUP {
            return Err(SitelapseError::profile(
                "the DEFAULT group is reserved and cannot be renamed",
            ));
        }
        if to.trim().is_empty() {
            return Err(SitelapseError::profile("group name must be non-empty"));
        }
        if self.groups.contains_key(to) {
            return Err(SitelapseError::profile(format!(
                "group '{to}' already exists"
            )));
        }
        let Some(group) = self.groups.remove(from) else {
            return Err(SitelapseError::profile(format!("unknown group '{from}'")));
        };
        self.groups.insert(to.to_string(), group);
        self.version += 1;
        Ok(())
    }

    /// Synthesize the reserved default group when absent: one palette-seeded
    /// profile per distinct predefined type seen in the project.
    pub fn ensure_default_group<'a>(
        &mut self,
        types: impl IntoIterator<Item = &'a PredefinedType>,
    ) {
        if self.groups.contains_key(DEFAULT_GROUP) {
            return;
        }
        let mut group = ProfileGroup::default();
        for predefined_type in types {
            if group.find(predefined_type.as_str()).is_none() {
                group.profiles.push(default_profile_for_type(predefined_type));
            }
        }
        self.groups.insert(DEFAULT_GROUP.to_string(), group);
        self.version += 1;
    }

    /// Serialize the persisted document: top-level keys are group names,
    /// each value `{"profiles": [...]}`.
    pub fn to_json(&self) -> SitelapseResult<String> {
        serde_json::to_string_pretty(&self.groups)
            .map_err(|e| SitelapseError::serde(e.to_string()))
    }

    /// Parse a persisted document.
    ///
    /// Individually malformed profiles are skipped with a warning rather
    /// than failing the whole load; a structurally invalid document is an
    /// error.
    pub fn from_json(raw: &str) -> SitelapseResult<Self> {
        let doc: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(raw).map_err(|e| SitelapseError::serde(e.to_string()))?;
        let mut groups = BTreeMap::new();
        for (name, value) in doc {
            let mut group = ProfileGroup::default();
            let entries = value
                .get("profiles")
                .and_then(|p| p.as_array())
                .cloned()
                .unwrap_or_default();
            for entry in entries {
                match serde_json::from_value::<AppearanceProfile>(entry) {
                    Ok(profile) if profile.validate().is_ok() => {
                        if group.find(&profile.name).is_none() {
                            group.profiles.push(profile);
                        }
                    }
                    Ok(profile) => {
                        tracing::warn!(group = %name, profile = %profile.name, "skipping invalid profile");
                    }
                    Err(err) => {
                        tracing::warn!(group = %name, %err, "skipping malformed profile entry");
                    }
                }
            }
            groups.insert(name, group);
        }
        Ok(Self { groups, version: 0 })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/appearance/store.rs"]
mod tests;
