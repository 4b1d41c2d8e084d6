use std::collections::BTreeMap;

use crate::{
    appearance::profile::PhaseMode,
    appearance::resolve::{GroupStack, resolve},
    appearance::store::ProfileStore,
    foundation::core::FrameSpan,
    schedule::model::{ElementId, PredefinedType, Relationship, Schedule, Task, TaskId},
    timeline::mapper::map_date_to_frame,
    timeline::window::VizWindow,
};

/// Per-element frame interval records, one list entry per contributing task.
pub type Timeline = BTreeMap<ElementId, Vec<FrameIntervalRecord>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// The three phase spans of one task contribution. Any span may be empty;
/// non-empty neighbours are adjacent (`before_start.end + 1 == active.start`,
/// `active.end + 1 == after_end.start`) and together they partition the
/// window's frame range.
pub struct PhaseSpans {
    /// Frames before the task starts.
    pub before_start: FrameSpan,
    /// Frames while the task runs.
    pub active: FrameSpan,
    /// Frames after the task ends.
    pub after_end: FrameSpan,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One task's contribution to one element's timeline.
pub struct FrameIntervalRecord {
    /// Contributing task.
    pub task: TaskId,
    /// The task's predefined type at compile time.
    pub predefined_type: PredefinedType,
    /// Whether the element is an output or an input of the task.
    pub relationship: Relationship,
    /// Phase spans, clamped to the window's frame range.
    pub spans: PhaseSpans,
    /// Priority mode: dates were ignored and `spans.active` covers the full
    /// range; the materializer pins the start appearance across it.
    pub static_start: bool,
}

/// Walk every task of the schedule and emit per-element phase spans.
///
/// Traversal is an explicit-stack post-order walk; order only matters for
/// the later last-write-wins merge, intervals themselves are additive per
/// element. Tasks missing either derived date contribute nothing but their
/// subtrees are still visited.
#[tracing::instrument(skip_all, fields(tasks = schedule.len()))]
pub fn compute_timeline(
    schedule: &Schedule,
    window: &VizWindow,
    store: &ProfileStore,
    stack: &GroupStack,
) -> Timeline {
    let mut timeline = Timeline::new();
    for id in schedule.post_order() {
        let Some(task) = schedule.task(id) else {
            continue;
        };
        compile_task(task, id, window, store, stack, &mut timeline);
    }
    timeline
}

fn compile_task(
    task: &Task,
    id: TaskId,
    window: &VizWindow,
    store: &ProfileStore,
    stack: &GroupStack,
    timeline: &mut Timeline,
) {
    let Some((start, finish)) = task.dates() else {
        tracing::debug!(task = %task.name, "skipping task without derived dates");
        return;
    };

    let range = window.frame_span();
    let resolved = resolve(task, stack, store);
    if resolved.phase_mode() == PhaseMode::StaticStart {
        tracing::debug!(task = %task.name, "priority mode, ignoring dates");
        let spans = PhaseSpans {
            before_start: FrameSpan::empty_at(range.start),
            active: range,
            after_end: FrameSpan::empty_at(range.end + 1),
        };
        emit(task, id, spans, true, timeline);
        return;
    }

    if start > window.finish {
        return;
    }

    let spans = if finish < window.start {
        // Complete before the window opens: after_end covers everything.
        PhaseSpans {
            before_start: FrameSpan::empty_at(range.start),
            active: FrameSpan::empty_at(range.start),
            after_end: range,
        }
    } else {
        let active_start = map_date_to_frame(start.max(window.start), window);
        let active_end = map_date_to_frame(finish.min(window.finish), window).max(active_start);
        PhaseSpans {
            before_start: FrameSpan::new(range.start, active_start - 1),
            active: FrameSpan::new(active_start, active_end),
            after_end: FrameSpan::new(active_end + 1, range.end),
        }
    };
    emit(task, id, spans, false, timeline);
}

fn emit(task: &Task, id: TaskId, spans: PhaseSpans, static_start: bool, timeline: &mut Timeline) {
    for (elements, relationship) in [
        (&task.outputs, Relationship::Output),
        (&task.inputs, Relationship::Input),
    ] {
        for &element in elements {
            timeline.entry(element).or_default().push(FrameIntervalRecord {
                task: id,
                predefined_type: task.predefined_type.clone(),
                relationship,
                spans,
                static_start,
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/compiler.rs"]
mod tests;
