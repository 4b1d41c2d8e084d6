use crate::{
    foundation::core::{ColorRgba, color_is_valid},
    foundation::error::{SitelapseError, SitelapseResult},
    schedule::model::PredefinedType,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// How alpha moves between the two active-phase endpoints.
pub enum AlphaInterp {
    /// Hold the start alpha, jump at the end.
    Step,
    /// Linear ramp across the phase.
    #[default]
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How a resolved profile drives an element through the timeline.
pub enum PhaseMode {
    /// Phases follow the task's derived dates.
    DateDriven,
    /// Dates are ignored; the start appearance is pinned across the whole
    /// window. Used for reference or pre-existing geometry.
    StaticStart,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Named bundle of visibility/color/transparency rules for the three phases
/// of a task (before start, active, after end).
pub struct AppearanceProfile {
    /// Profile name; matched against predefined types during resolution.
    pub name: String,
    /// Whether the before-start phase writes any appearance.
    #[serde(default = "default_true")]
    pub consider_start: bool,
    /// Whether the active phase writes any appearance.
    #[serde(default = "default_true")]
    pub consider_active: bool,
    /// Whether the after-end phase writes any appearance.
    #[serde(default = "default_true")]
    pub consider_end: bool,
    /// Color shown before the task starts.
    #[serde(default = "default_start_color")]
    pub start_color: ColorRgba,
    /// Color shown while the task runs.
    #[serde(default = "default_in_progress_color")]
    pub in_progress_color: ColorRgba,
    /// Color shown after the task ends.
    #[serde(default = "default_end_color")]
    pub end_color: ColorRgba,
    /// Use the element's original color before start instead of `start_color`.
    #[serde(default)]
    pub use_start_original_color: bool,
    /// Use the element's original color while active.
    #[serde(default)]
    pub use_active_original_color: bool,
    /// Use the element's original color after end.
    #[serde(default = "default_true")]
    pub use_end_original_color: bool,
    /// Transparency before start (0 opaque, 1 invisible).
    #[serde(default)]
    pub start_transparency: f32,
    /// Transparency at the first active frame.
    #[serde(default)]
    pub active_start_transparency: f32,
    /// Transparency at the last active frame.
    #[serde(default)]
    pub active_finish_transparency: f32,
    /// Interpolation between the two active transparencies.
    #[serde(default)]
    pub active_transparency_interpol: AlphaInterp,
    /// Transparency after end.
    #[serde(default)]
    pub end_transparency: f32,
    /// Hide the element once its task ends, overriding every other
    /// end-state setting. Terminal: demolished geometry never comes back.
    #[serde(default)]
    pub hide_at_end: bool,
}

fn default_true() -> bool {
    true
}

fn default_start_color() -> ColorRgba {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_in_progress_color() -> ColorRgba {
    [1.0, 1.0, 0.0, 1.0]
}

fn default_end_color() -> ColorRgba {
    [0.0, 1.0, 0.0, 1.0]
}

impl AppearanceProfile {
    /// Profile with the given name and neutral defaults for everything else.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            consider_start: true,
            consider_active: true,
            consider_end: true,
            start_color: default_start_color(),
            in_progress_color: default_in_progress_color(),
            end_color: default_end_color(),
            use_start_original_color: false,
            use_active_original_color: false,
            use_end_original_color: true,
            start_transparency: 0.0,
            active_start_transparency: 0.0,
            active_finish_transparency: 0.0,
            active_transparency_interpol: AlphaInterp::Linear,
            end_transparency: 0.0,
            hide_at_end: false,
        }
    }

    /// Synthesized fallback for a task no group has a profile for.
    ///
    /// All phases considered; demolition-like types disappear at the end.
    pub fn generic(predefined_type: &PredefinedType) -> Self {
        Self {
            start_color: [1.0, 1.0, 1.0, 0.0],
            in_progress_color: [1.0, 0.5, 0.0, 1.0],
            end_color: [0.8, 0.8, 0.8, 1.0],
            hide_at_end: predefined_type.is_demolition_like(),
            ..Self::named(predefined_type.as_str())
        }
    }

    /// The phase mode this profile's consider flags encode.
    pub fn phase_mode(&self) -> PhaseMode {
        if self.consider_start && !self.consider_active && !self.consider_end {
            PhaseMode::StaticStart
        } else {
            PhaseMode::DateDriven
        }
    }

    /// Validate colors, transparencies, and the name.
    pub fn validate(&self) -> SitelapseResult<()> {
        if self.name.trim().is_empty() {
            return Err(SitelapseError::profile("profile name must be non-empty"));
        }
        for (field, color) in [
            ("start_color", &self.start_color),
            ("in_progress_color", &self.in_progress_color),
            ("end_color", &self.end_color),
        ] {
            if !color_is_valid(color) {
                return Err(SitelapseError::profile(format!(
                    "profile '{}' has invalid {field} (channels must be finite in 0..=1)",
                    self.name
                )));
            }
        }
        for (field, value) in [
            ("start_transparency", self.start_transparency),
            ("active_start_transparency", self.active_start_transparency),
            (
                "active_finish_transparency",
                self.active_finish_transparency,
            ),
            ("end_transparency", self.end_transparency),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SitelapseError::profile(format!(
                    "profile '{}' has invalid {field} (must be finite in 0..=1)",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// Fixed palette behind the reserved default group, keyed by predefined
/// type: (start, active, end) colors.
const DEFAULT_PALETTE: [(&str, ColorRgba, ColorRgba, ColorRgba); 10] = [
    (
        "CONSTRUCTION",
        [1.0, 1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0, 1.0],
        [0.3, 1.0, 0.3, 1.0],
    ),
    (
        "INSTALLATION",
        [1.0, 1.0, 1.0, 0.0],
        [0.0, 0.8, 0.5, 1.0],
        [0.3, 0.8, 0.5, 1.0],
    ),
    (
        "DEMOLITION",
        [1.0, 1.0, 1.0, 1.0],
        [1.0, 0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0, 0.0],
    ),
    (
        "REMOVAL",
        [1.0, 1.0, 1.0, 1.0],
        [1.0, 0.3, 0.0, 1.0],
        [0.0, 0.0, 0.0, 0.0],
    ),
    (
        "DISPOSAL",
        [1.0, 1.0, 1.0, 1.0],
        [0.8, 0.0, 0.2, 1.0],
        [0.0, 0.0, 0.0, 0.0],
    ),
    (
        "DISMANTLE",
        [1.0, 1.0, 1.0, 1.0],
        [1.0, 0.5, 0.0, 1.0],
        [0.0, 0.0, 0.0, 0.0],
    ),
    (
        "OPERATION",
        [1.0, 1.0, 1.0, 1.0],
        [0.0, 0.5, 1.0, 1.0],
        [1.0, 1.0, 1.0, 1.0],
    ),
    (
        "MAINTENANCE",
        [1.0, 1.0, 1.0, 1.0],
        [0.3, 0.6, 1.0, 1.0],
        [1.0, 1.0, 1.0, 1.0],
    ),
    (
        "ATTENDANCE",
        [1.0, 1.0, 1.0, 1.0],
        [0.5, 0.5, 1.0, 1.0],
        [1.0, 1.0, 1.0, 1.0],
    ),
    (
        "RENOVATION",
        [1.0, 1.0, 1.0, 1.0],
        [0.5, 0.0, 1.0, 1.0],
        [0.9, 0.9, 0.9, 1.0],
    ),
];

/// Palette profile for `predefined_type`, if the fixed palette covers it.
pub fn palette_profile(predefined_type: &PredefinedType) -> Option<AppearanceProfile> {
    let (name, start, active, end) = DEFAULT_PALETTE
        .iter()
        .find(|(name, ..)| *name == predefined_type.as_str())?;
    let disappears = predefined_type.is_demolition_like();
    Some(AppearanceProfile {
        start_color: *start,
        in_progress_color: *active,
        end_color: *end,
        use_end_original_color: !disappears,
        hide_at_end: disappears,
        ..AppearanceProfile::named(*name)
    })
}

/// Default-group profile for `predefined_type`: palette entry when covered,
/// generic synthesis otherwise.
pub fn default_profile_for_type(predefined_type: &PredefinedType) -> AppearanceProfile {
    palette_profile(predefined_type).unwrap_or_else(|| AppearanceProfile::generic(predefined_type))
}

#[cfg(test)]
#[path = "../../tests/unit/appearance/profile.rs"]
mod tests;
