use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::{
    schedule::model::{ElementId, Schedule, Task},
    timeline::window::VizWindow,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Six-way classification of every element's construction state at one
/// instant. An element touched by several tasks may appear in several sets;
/// consumers decide precedence.
pub struct Snapshot {
    /// Outputs of tasks that have not started yet.
    pub to_build: BTreeSet<ElementId>,
    /// Outputs of tasks currently running.
    pub in_construction: BTreeSet<ElementId>,
    /// Outputs of tasks already finished.
    pub completed: BTreeSet<ElementId>,
    /// Inputs of tasks that have not started yet.
    pub to_demolish: BTreeSet<ElementId>,
    /// Inputs of tasks currently running.
    pub in_demolition: BTreeSet<ElementId>,
    /// Inputs of tasks already finished.
    pub demolished: BTreeSet<ElementId>,
}

impl Snapshot {
    /// Whether no element was classified at all.
    pub fn is_empty(&self) -> bool {
        self.to_build.is_empty()
            && self.in_construction.is_empty()
            && self.completed.is_empty()
            && self.to_demolish.is_empty()
            && self.in_demolition.is_empty()
            && self.demolished.is_empty()
    }
}

/// Classify every element's state at `date`.
///
/// The date-scalar sibling of the interval compiler: the same three-way
/// window comparison per task, but against one instant instead of frames.
/// Nested tasks are visited unconditionally, whatever the parent's dates
/// look like; tasks missing either date contribute nothing.
#[tracing::instrument(skip_all, fields(tasks = schedule.len(), %date))]
pub fn classify_at(schedule: &Schedule, date: NaiveDateTime, window: &VizWindow) -> Snapshot {
    let mut snapshot = Snapshot::default();
    for id in schedule.post_order() {
        if let Some(task) = schedule.task(id) {
            classify_task(task, date, window, &mut snapshot);
        }
    }
    snapshot
}

fn classify_task(task: &Task, date: NaiveDateTime, window: &VizWindow, snapshot: &mut Snapshot) {
    let Some((start, finish)) = task.dates() else {
        return;
    };

    // Starts after the window closes: excluded from the snapshot entirely.
    if start > window.finish {
        return;
    }

    // Finished before the window opens: settled long ago.
    if finish < window.start {
        snapshot.completed.extend(task.outputs.iter().copied());
        snapshot.demolished.extend(task.inputs.iter().copied());
        return;
    }

    if date < start {
        snapshot.to_build.extend(task.outputs.iter().copied());
        snapshot.to_demolish.extend(task.inputs.iter().copied());
    } else if date <= finish {
        snapshot.in_construction.extend(task.outputs.iter().copied());
        snapshot.in_demolition.extend(task.inputs.iter().copied());
    } else {
        snapshot.completed.extend(task.outputs.iter().copied());
        snapshot.demolished.extend(task.inputs.iter().copied());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/snapshot/classify.rs"]
mod tests;
