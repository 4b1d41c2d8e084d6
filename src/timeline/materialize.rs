use std::collections::BTreeMap;

use crate::{
    appearance::profile::{AlphaInterp, AppearanceProfile},
    appearance::resolve::{GroupStack, ResolvedProfile, ResolutionSource, resolve},
    appearance::store::ProfileStore,
    foundation::core::{ColorRgba, FrameSpan},
    schedule::model::{ElementId, Relationship, Schedule},
    timeline::compiler::{FrameIntervalRecord, Timeline},
    timeline::window::VizWindow,
};

/// Fallback color for elements whose original color is unknown.
const NEUTRAL_COLOR: ColorRgba = [1.0, 1.0, 1.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Instantaneous appearance of an element at one frame.
pub struct ElementAppearance {
    /// Whether the element is shown.
    pub visible: bool,
    /// Display color including alpha.
    pub color: ColorRgba,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
struct VisibilityKey {
    frame: i64,
    visible: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
struct ColorKey {
    frame: i64,
    color: ColorRgba,
    /// Interpolation toward the next key.
    interp: AlphaInterp,
}

#[derive(Clone, Debug, Default, serde::Serialize)]
/// Keyframe channels for one element: visibility and color.
///
/// Keys hold forward until the next key, like scene keyframes; frames before
/// the first key take the first key's value. Writing a key at an occupied
/// frame replaces it, which is how later task contributions win.
pub struct ElementTrack {
    visibility: Vec<VisibilityKey>,
    color: Vec<ColorKey>,
}

impl ElementTrack {
    fn set_visibility(&mut self, frame: i64, visible: bool) {
        let key = VisibilityKey { frame, visible };
        match self.visibility.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => self.visibility[i] = key,
            Err(i) => self.visibility.insert(i, key),
        }
    }

    fn set_color(&mut self, frame: i64, color: ColorRgba, interp: AlphaInterp) {
        let key = ColorKey {
            frame,
            color,
            interp,
        };
        match self.color.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => self.color[i] = key,
            Err(i) => self.color.insert(i, key),
        }
    }

    /// Sample the track at `frame`.
    ///
    /// An element with no keys at all reads as visible in the neutral color;
    /// the materializer only produces keyless tracks for elements it was
    /// never told about.
    pub fn sample(&self, frame: i64) -> ElementAppearance {
        ElementAppearance {
            visible: self.sample_visibility(frame),
            color: self.sample_color(frame),
        }
    }

    fn sample_visibility(&self, frame: i64) -> bool {
        if self.visibility.is_empty() {
            return true;
        }
        match self.visibility.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => self.visibility[i].visible,
            Err(0) => self.visibility[0].visible,
            Err(i) => self.visibility[i - 1].visible,
        }
    }

    fn sample_color(&self, frame: i64) -> ColorRgba {
        if self.color.is_empty() {
            return NEUTRAL_COLOR;
        }
        let i = match self.color.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => return self.color[i].color,
            Err(0) => return self.color[0].color,
            Err(i) => i - 1,
        };
        let prev = self.color[i];
        match self.color.get(i + 1) {
            Some(next) if prev.interp == AlphaInterp::Linear => {
                // Only alpha ramps between endpoints; RGB holds from the
                // earlier key (phase endpoints share RGB anyway).
                let t = (frame - prev.frame) as f32 / (next.frame - prev.frame) as f32;
                let alpha = prev.color[3] + (next.color[3] - prev.color[3]) * t;
                [prev.color[0], prev.color[1], prev.color[2], alpha]
            }
            _ => prev.color,
        }
    }

    /// Visibility keyframes in frame order, for writing into a scene.
    pub fn visibility_keyframes(&self) -> impl Iterator<Item = (i64, bool)> + '_ {
        self.visibility.iter().map(|k| (k.frame, k.visible))
    }

    /// Color keyframes in frame order, with the interpolation toward the
    /// following key.
    pub fn color_keyframes(&self) -> impl Iterator<Item = (i64, ColorRgba, AlphaInterp)> + '_ {
        self.color.iter().map(|k| (k.frame, k.color, k.interp))
    }
}

/// Keyframe tracks for every element touched by a run.
pub type ElementTracks = BTreeMap<ElementId, ElementTrack>;

/// Combine compiled intervals with resolved profiles into per-element
/// keyframe tracks.
///
/// `original_colors` supplies the as-modeled color of every project element;
/// elements listed there but absent from the timeline are hidden for the
/// whole range (nothing schedules them into view). Records are applied in
/// task-visit order, so overlapping writes at the same frame are
/// last-write-wins.
#[tracing::instrument(skip_all, fields(elements = timeline.len()))]
pub fn materialize(
    timeline: &Timeline,
    schedule: &Schedule,
    store: &ProfileStore,
    stack: &GroupStack,
    window: &VizWindow,
    original_colors: &BTreeMap<ElementId, ColorRgba>,
) -> ElementTracks {
    let range = window.frame_span();
    let mut tracks = ElementTracks::new();

    for (&element, _) in original_colors.iter().filter(|(e, _)| !timeline.contains_key(*e)) {
        let track: &mut ElementTrack = tracks.entry(element).or_default();
        track.set_visibility(range.start, false);
    }

    for (&element, records) in timeline {
        let original = original_colors.get(&element).copied().unwrap_or(NEUTRAL_COLOR);
        let track = tracks.entry(element).or_default();
        for record in records {
            let resolved = resolve_record(record, schedule, store, stack);
            apply_record(track, record, &resolved.profile, original);
        }
    }

    tracks
}

fn resolve_record(
    record: &FrameIntervalRecord,
    schedule: &Schedule,
    store: &ProfileStore,
    stack: &GroupStack,
) -> ResolvedProfile {
    match schedule.task(record.task) {
        Some(task) => resolve(task, stack, store),
        // Record from a foreign schedule; degrade to synthesis.
        None => ResolvedProfile {
            profile: AppearanceProfile::generic(&record.predefined_type),
            source: ResolutionSource::Synthesized,
        },
    }
}

fn apply_record(
    track: &mut ElementTrack,
    record: &FrameIntervalRecord,
    profile: &AppearanceProfile,
    original: ColorRgba,
) {
    if record.static_start {
        // Priority mode: the start appearance holds across the whole range.
        apply_start(track, profile, record.spans.active, original);
        return;
    }

    let spans = record.spans;
    if !spans.before_start.is_empty() {
        if profile.consider_start {
            apply_start(track, profile, spans.before_start, original);
        } else if record.relationship == Relationship::Output {
            // Not-yet-built geometry defaults to hidden; inputs (not yet
            // demolished) stay visible untouched.
            apply_hidden(track, spans.before_start);
        }
    }
    if !spans.active.is_empty() && profile.consider_active {
        apply_active(track, profile, spans.active, original);
    }
    if !spans.after_end.is_empty() {
        if profile.hide_at_end {
            track.set_visibility(spans.after_end.start, false);
        } else if profile.consider_end {
            apply_end(track, profile, spans.after_end, original);
        }
    }
}

fn apply_start(
    track: &mut ElementTrack,
    profile: &AppearanceProfile,
    span: FrameSpan,
    original: ColorRgba,
) {
    track.set_visibility(span.start, true);
    let base = if profile.use_start_original_color {
        original
    } else {
        profile.start_color
    };
    let color = [base[0], base[1], base[2], 1.0 - profile.start_transparency];
    track.set_color(span.start, color, AlphaInterp::Step);
    if span.end > span.start {
        track.set_visibility(span.end, true);
        track.set_color(span.end, color, AlphaInterp::Step);
    }
}

fn apply_active(
    track: &mut ElementTrack,
    profile: &AppearanceProfile,
    span: FrameSpan,
    original: ColorRgba,
) {
    track.set_visibility(span.start, true);
    let base = if profile.use_active_original_color {
        original
    } else {
        profile.in_progress_color
    };
    let start_color = [
        base[0],
        base[1],
        base[2],
        1.0 - profile.active_start_transparency,
    ];
    track.set_color(span.start, start_color, profile.active_transparency_interpol);
    if span.end > span.start {
        let end_color = [
            base[0],
            base[1],
            base[2],
            1.0 - profile.active_finish_transparency,
        ];
        track.set_color(span.end, end_color, profile.active_transparency_interpol);
    }
}

fn apply_end(
    track: &mut ElementTrack,
    profile: &AppearanceProfile,
    span: FrameSpan,
    original: ColorRgba,
) {
    track.set_visibility(span.start, true);
    let base = if profile.use_end_original_color {
        original
    } else {
        profile.end_color
    };
    let color = [base[0], base[1], base[2], 1.0 - profile.end_transparency];
    track.set_color(span.start, color, AlphaInterp::Step);
}

fn apply_hidden(track: &mut ElementTrack, span: FrameSpan) {
    track.set_visibility(span.start, false);
    if span.end > span.start {
        track.set_visibility(span.end, false);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/materialize.rs"]
mod tests;
