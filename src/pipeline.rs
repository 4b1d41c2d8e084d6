//! High-level entry points tying window resolution to the pipeline stages.
//!
//! These are the only calls that fail visibly, and only because the
//! visualization window could not be resolved; everything past that point
//! degrades per-task instead of aborting.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::{
    appearance::resolve::GroupStack,
    appearance::store::ProfileStore,
    foundation::core::ColorRgba,
    foundation::error::SitelapseResult,
    schedule::model::{ElementId, Schedule},
    snapshot::classify::{Snapshot, classify_at},
    timeline::compiler::{Timeline, compute_timeline},
    timeline::materialize::{ElementTracks, materialize},
    timeline::window::{VizWindow, WindowConfig},
};

#[derive(Clone, Debug)]
/// Output of [`build_timeline`]: the resolved window and the compiled
/// per-element intervals.
pub struct TimelineRun {
    /// Window the run was computed against.
    pub window: VizWindow,
    /// Compiled per-element frame intervals.
    pub timeline: Timeline,
}

/// Resolve the window and compile the frame-interval timeline.
pub fn build_timeline(
    schedule: &Schedule,
    config: &WindowConfig,
    store: &ProfileStore,
    stack: &GroupStack,
) -> SitelapseResult<TimelineRun> {
    let window = config.resolve()?;
    let timeline = compute_timeline(schedule, &window, store, stack);
    Ok(TimelineRun { window, timeline })
}

/// Resolve the window, compile, and materialize element tracks in one call.
pub fn build_tracks(
    schedule: &Schedule,
    config: &WindowConfig,
    store: &ProfileStore,
    stack: &GroupStack,
    original_colors: &BTreeMap<ElementId, ColorRgba>,
) -> SitelapseResult<(TimelineRun, ElementTracks)> {
    let run = build_timeline(schedule, config, store, stack)?;
    let tracks = materialize(
        &run.timeline,
        schedule,
        store,
        stack,
        &run.window,
        original_colors,
    );
    Ok((run, tracks))
}

/// Resolve the window and classify every element's state at `date`.
pub fn build_snapshot(
    schedule: &Schedule,
    date: NaiveDateTime,
    config: &WindowConfig,
) -> SitelapseResult<Snapshot> {
    let window = config.resolve()?;
    Ok(classify_at(schedule, date, &window))
}
