use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;

use crate::foundation::error::{SitelapseError, SitelapseResult};

/// Predefined types that make an element disappear once its task finishes.
const DEMOLITION_LIKE: [&str; 4] = ["DEMOLITION", "REMOVAL", "DISPOSAL", "DISMANTLE"];

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Index of a task inside its owning [`Schedule`] arena.
pub struct TaskId(pub(crate) u32);

impl TaskId {
    /// Access raw arena index.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Stable identifier of a model element (a built or consumed component).
pub struct ElementId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
/// Category tag on a task (construction, demolition, logistics, ...).
///
/// Stored uppercase; unknown or empty tags normalize to `NOTDEFINED`.
pub struct PredefinedType(String);

impl PredefinedType {
    /// Normalize a raw tag; empty input becomes `NOTDEFINED`.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            Self::not_defined()
        } else {
            Self(s.to_uppercase())
        }
    }

    /// The `NOTDEFINED` fallback tag.
    pub fn not_defined() -> Self {
        Self("NOTDEFINED".to_string())
    }

    /// The normalized tag string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether tasks of this type remove their elements from the model.
    pub fn is_demolition_like(&self) -> bool {
        DEMOLITION_LIKE.contains(&self.0.as_str())
    }
}

impl std::fmt::Display for PredefinedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// How an element is associated with a task.
pub enum Relationship {
    /// The task builds or installs the element.
    Output,
    /// The task consumes or affects the element.
    Input,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A scheduled unit of work, read-only inside this crate.
///
/// Dates are the *derived* start/finish computed by the external schedule
/// layer (rolling up nested tasks and calendars); either may be absent.
pub struct Task {
    /// Task name for diagnostics.
    pub name: String,
    /// Category tag driving default appearance.
    pub predefined_type: PredefinedType,
    /// Derived schedule start.
    pub start: Option<NaiveDateTime>,
    /// Derived schedule finish.
    pub finish: Option<NaiveDateTime>,
    /// Elements built by this task.
    pub outputs: Vec<ElementId>,
    /// Elements consumed or affected by this task.
    pub inputs: Vec<ElementId>,
    /// Explicit per-group appearance profile choices, keyed by group name.
    #[serde(default)]
    pub profile_choices: BTreeMap<String, String>,
    /// Nested tasks.
    #[serde(default)]
    pub children: Vec<TaskId>,
}

impl Task {
    /// Minimal task with the given name and type and no dates.
    pub fn new(name: impl Into<String>, predefined_type: PredefinedType) -> Self {
        Self {
            name: name.into(),
            predefined_type,
            start: None,
            finish: None,
            outputs: Vec::new(),
            inputs: Vec::new(),
            profile_choices: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Both derived dates, or `None` when either is missing.
    pub fn dates(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.start?, self.finish?))
    }

    /// The explicit profile choice recorded for `group`, if any.
    pub fn profile_choice(&self, group: &str) -> Option<&str> {
        self.profile_choices.get(group).map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// Read-only snapshot of a work schedule: a task arena plus root order.
///
/// The schedule layer owns task CRUD and date derivation; this type is the
/// boundary the animation pipeline consumes.
pub struct Schedule {
    tasks: Vec<Task>,
    roots: Vec<TaskId>,
}

impl Schedule {
    /// Empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root task.
    pub fn add_root_task(&mut self, task: Task) -> TaskId {
        let id = TaskId(self.tasks.len() as u32);
        self.tasks.push(task);
        self.roots.push(id);
        id
    }

    /// Append a task nested under `parent`.
    pub fn add_nested_task(&mut self, parent: TaskId, task: Task) -> SitelapseResult<TaskId> {
        if parent.0 as usize >= self.tasks.len() {
            return Err(SitelapseError::validation(format!(
                "unknown parent task id {}",
                parent.0
            )));
        }
        let id = TaskId(self.tasks.len() as u32);
        self.tasks.push(task);
        self.tasks[parent.0 as usize].children.push(id);
        Ok(id)
    }

    /// Root task ids in schedule order.
    pub fn root_tasks(&self) -> &[TaskId] {
        &self.roots
    }

    /// Direct children of `id`.
    pub fn nested_tasks(&self, id: TaskId) -> &[TaskId] {
        self.task(id).map(|t| t.children.as_slice()).unwrap_or(&[])
    }

    /// Look up a task; `None` for ids from another schedule.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id.0 as usize)
    }

    /// Number of tasks in the arena.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the schedule holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Post-order traversal of the whole tree (children before parents),
    /// driven by an explicit stack so arbitrarily deep schedules cannot
    /// overflow the call stack.
    pub fn post_order(&self) -> Vec<TaskId> {
        let mut out = Vec::with_capacity(self.tasks.len());
        let mut stack: Vec<(TaskId, bool)> =
            self.roots.iter().rev().map(|&id| (id, false)).collect();
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                out.push(id);
                continue;
            }
            stack.push((id, true));
            if let Some(task) = self.task(id) {
                for &child in task.children.iter().rev() {
                    stack.push((child, false));
                }
            }
        }
        out
    }

    /// All elements referenced as an output or input of any task.
    pub fn element_ids(&self) -> BTreeSet<ElementId> {
        let mut out = BTreeSet::new();
        for task in &self.tasks {
            out.extend(task.outputs.iter().copied());
            out.extend(task.inputs.iter().copied());
        }
        out
    }

    /// Distinct predefined types seen across the schedule.
    pub fn predefined_types(&self) -> BTreeSet<PredefinedType> {
        self.tasks
            .iter()
            .map(|t| t.predefined_type.clone())
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/model.rs"]
mod tests;
