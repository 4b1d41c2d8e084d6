//! Sitelapse is a schedule-to-timeline animation engine for 4D construction
//! sequencing.
//!
//! It turns a hierarchical task schedule (tasks with derived dates,
//! output/input element associations, and a predefined-type category) into
//! two things:
//!
//! 1. **Timeline**: per-element frame intervals for the three phases of each
//!    contributing task (`before_start`, `active`, `after_end`), materialized
//!    into visibility/color keyframe tracks for frame-based playback
//! 2. **Snapshot**: a six-way classification of every element's construction
//!    state at one arbitrary date
//!
//! # Pipeline overview
//!
//! 1. **Resolve window**: `WindowConfig -> VizWindow` (calendar range mapped
//!    onto a frame range; the only visibly fallible step)
//! 2. **Compile**: `Schedule + VizWindow -> Timeline` (per-element phase
//!    spans, one record per contributing task)
//! 3. **Materialize**: `Timeline + resolved profiles -> ElementTracks`
//!    (visibility/color keyframes, last-write-wins across tasks)
//! 4. **Classify** (alternative to 2–3): `Schedule + date -> Snapshot`
//!
//! Appearance comes from named [`AppearanceProfile`]s in named groups inside
//! a [`ProfileStore`], resolved per task through a fixed cascade that never
//! comes back empty; the reserved `DEFAULT` group is synthesized from a
//! fixed palette.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic and idempotent**: the whole pipeline is pure for a
//!   given input; re-running is free of surprises.
//! - **Degrade, don't abort**: a malformed task or profile costs its own
//!   contribution, never the run. Only an unresolvable visualization window
//!   is a visible error.
//! - **Single-threaded**: one run per user-triggered rebuild; the profile
//!   store assumes a single active editor.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod appearance;
mod foundation;
mod pipeline;
mod schedule;
mod snapshot;
mod timeline;

pub use appearance::profile::{
    AlphaInterp, AppearanceProfile, PhaseMode, default_profile_for_type, palette_profile,
};
pub use appearance::resolve::{
    GroupStack, GroupStackEntry, ResolutionSource, ResolvedProfile, resolve,
};
pub use appearance::store::{DEFAULT_GROUP, ProfileGroup, ProfileStore};
pub use foundation::core::{ColorRgba, FrameSpan, color_is_valid};
pub use foundation::date::{format_isodatetime, parse_isodatetime};
pub use foundation::error::{SitelapseError, SitelapseResult};
pub use pipeline::{TimelineRun, build_snapshot, build_timeline, build_tracks};
pub use schedule::model::{ElementId, PredefinedType, Relationship, Schedule, Task, TaskId};
pub use snapshot::classify::{Snapshot, classify_at};
pub use timeline::compiler::{FrameIntervalRecord, PhaseSpans, Timeline, compute_timeline};
pub use timeline::materialize::{ElementAppearance, ElementTrack, ElementTracks, materialize};
pub use timeline::mapper::map_date_to_frame;
pub use timeline::window::{SpeedMode, VizWindow, WindowConfig};
