use crate::{
    appearance::profile::{AppearanceProfile, PhaseMode, palette_profile},
    appearance::store::{DEFAULT_GROUP, ProfileStore},
    schedule::model::Task,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One entry of the active group stack.
pub struct GroupStackEntry {
    /// Profile group name.
    pub group: String,
    /// Disabled entries are skipped during resolution.
    pub enabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Ordered group stack; the first enabled entry is the active group.
pub struct GroupStack {
    entries: Vec<GroupStackEntry>,
}

impl GroupStack {
    /// Empty stack; resolution falls back to the default group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, group: impl Into<String>, enabled: bool) {
        self.entries.push(GroupStackEntry {
            group: group.into(),
            enabled,
        });
    }

    /// All entries in stack order.
    pub fn entries(&self) -> &[GroupStackEntry] {
        &self.entries
    }

    /// First enabled group, or the reserved default group when the stack is
    /// empty or fully disabled.
    pub fn active_group(&self) -> &str {
        self.entries
            .iter()
            .find(|e| e.enabled && !e.group.trim().is_empty())
            .map(|e| e.group.as_str())
            .unwrap_or(DEFAULT_GROUP)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Which resolution strategy produced a profile.
pub enum ResolutionSource {
    /// The task's explicit profile choice for the active group.
    TaskChoice,
    /// A profile named after the task's predefined type in the active group.
    ActiveGroupType,
    /// A profile named after the predefined type in the default group.
    DefaultGroupType,
    /// Synthesized generic fallback.
    Synthesized,
}

#[derive(Clone, Debug)]
/// Outcome of profile resolution: the effective profile plus provenance.
pub struct ResolvedProfile {
    /// Effective appearance profile.
    pub profile: AppearanceProfile,
    /// Strategy that produced it.
    pub source: ResolutionSource,
}

impl ResolvedProfile {
    /// Phase mode of the effective profile.
    pub fn phase_mode(&self) -> PhaseMode {
        self.profile.phase_mode()
    }
}

/// Resolve the effective profile for `task` against the active group.
///
/// Cascade, first hit wins: the task's explicit choice in the active group,
/// the predefined-type profile in the active group, the predefined-type
/// profile in the default group (the fixed palette stands in when the store
/// has no default group yet), then generic synthesis. Never empty.
pub fn resolve(task: &Task, stack: &GroupStack, store: &ProfileStore) -> ResolvedProfile {
    let group = stack.active_group();

    if let Some(profile) = resolve_task_choice(task, group, store) {
        return ResolvedProfile {
            profile,
            source: ResolutionSource::TaskChoice,
        };
    }
    if let Some(profile) = resolve_group_type(task, group, store) {
        return ResolvedProfile {
            profile,
            source: ResolutionSource::ActiveGroupType,
        };
    }
    if let Some(profile) = resolve_default_type(task, group, store) {
        return ResolvedProfile {
            profile,
            source: ResolutionSource::DefaultGroupType,
        };
    }
    tracing::debug!(task = %task.name, "synthesizing generic profile");
    ResolvedProfile {
        profile: AppearanceProfile::generic(&task.predefined_type),
        source: ResolutionSource::Synthesized,
    }
}

fn resolve_task_choice(task: &Task, group: &str, store: &ProfileStore) -> Option<AppearanceProfile> {
    let choice = task.profile_choice(group)?;
    store.get(group, choice).cloned()
}

fn resolve_group_type(task: &Task, group: &str, store: &ProfileStore) -> Option<AppearanceProfile> {
    store.get(group, task.predefined_type.as_str()).cloned()
}

fn resolve_default_type(
    task: &Task,
    group: &str,
    store: &ProfileStore,
) -> Option<AppearanceProfile> {
    if group == DEFAULT_GROUP && store.group(DEFAULT_GROUP).is_some() {
        // Already consulted as the active group.
        return None;
    }
    store
        .get(DEFAULT_GROUP, task.predefined_type.as_str())
        .cloned()
        .or_else(|| palette_profile(&task.predefined_type))
}

#[cfg(test)]
#[path = "../../tests/unit/appearance/resolve.rs"]
mod tests;
