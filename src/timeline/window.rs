use chrono::{Duration, NaiveDateTime};

use crate::{
    foundation::core::FrameSpan,
    foundation::error::{SitelapseError, SitelapseResult},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How the total frame count of a run is derived from the date range.
pub enum SpeedMode {
    /// One animation second covers `multiplier` real seconds.
    Multiplier {
        /// Real-to-animation time ratio; must be > 0.
        multiplier: f64,
    },
    /// A given real duration plays back over a given animation duration.
    DurationRatio {
        /// Animation duration in seconds; must be > 0.
        animation_secs: f64,
        /// Real duration in seconds; must be > 0.
        real_secs: f64,
        /// Playback frame rate; must be > 0.
        fps: u32,
    },
    /// A given real duration maps to a fixed number of frames.
    FrameCount {
        /// Frames per `real_secs`; must be > 0.
        frames: i64,
        /// Real duration in seconds; must be > 0.
        real_secs: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// User-facing window configuration, resolved once per run into a
/// [`VizWindow`].
pub struct WindowConfig {
    /// Visualization range start; unset means the window is not configured.
    pub start: Option<NaiveDateTime>,
    /// Visualization range finish.
    pub finish: Option<NaiveDateTime>,
    /// First frame of the run.
    pub start_frame: i64,
    /// Speed setting deriving the total frame count.
    pub speed: SpeedMode,
}

impl WindowConfig {
    /// Config covering `start..finish` at one frame per real second-span
    /// given by `multiplier`, starting at frame 1.
    pub fn new(start: NaiveDateTime, finish: NaiveDateTime) -> Self {
        Self {
            start: Some(start),
            finish: Some(finish),
            start_frame: 1,
            speed: SpeedMode::Multiplier { multiplier: 1.0 },
        }
    }

    /// Resolve into an immutable [`VizWindow`].
    ///
    /// The only visible failures of the pipeline live here: an unset or
    /// inverted date range, or a non-positive speed setting. Equal dates
    /// degrade to a one-day window instead of failing.
    pub fn resolve(&self) -> SitelapseResult<VizWindow> {
        let (Some(start), Some(mut finish)) = (self.start, self.finish) else {
            return Err(SitelapseError::window("visualization window is unset"));
        };
        if finish == start {
            finish = start + Duration::days(1);
        }
        if finish < start {
            return Err(SitelapseError::window(format!(
                "window finish {finish} must be after start {start}"
            )));
        }
        let real_secs = (finish - start).num_seconds() as f64;
        let total = match self.speed {
            SpeedMode::Multiplier { multiplier } => {
                if !multiplier.is_finite() || multiplier <= 0.0 {
                    return Err(SitelapseError::window("speed multiplier must be > 0"));
                }
                real_secs / multiplier
            }
            SpeedMode::DurationRatio {
                animation_secs,
                real_secs: ratio_real,
                fps,
            } => {
                if !animation_secs.is_finite()
                    || animation_secs <= 0.0
                    || !ratio_real.is_finite()
                    || ratio_real <= 0.0
                    || fps == 0
                {
                    return Err(SitelapseError::window(
                        "speed duration ratio requires positive durations and fps",
                    ));
                }
                real_secs / (ratio_real / animation_secs) * f64::from(fps)
            }
            SpeedMode::FrameCount { frames, real_secs: count_real } => {
                if frames <= 0 || !count_real.is_finite() || count_real <= 0.0 {
                    return Err(SitelapseError::window(
                        "speed frame count requires positive frames and duration",
                    ));
                }
                real_secs / count_real * frames as f64
            }
        };
        let total_frames = (total.round() as i64).max(1);
        VizWindow::new(start, finish, self.start_frame, total_frames)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Immutable visualization window of one computation run: a calendar range
/// plus the frame range it maps onto.
pub struct VizWindow {
    /// Calendar range start.
    pub start: NaiveDateTime,
    /// Calendar range finish; always after `start`.
    pub finish: NaiveDateTime,
    /// First frame of the run.
    pub start_frame: i64,
    /// Frame count; the run covers `[start_frame, start_frame + total_frames]`.
    pub total_frames: i64,
}

impl VizWindow {
    /// Build a window, validating `finish > start` and `total_frames > 0`.
    pub fn new(
        start: NaiveDateTime,
        finish: NaiveDateTime,
        start_frame: i64,
        total_frames: i64,
    ) -> SitelapseResult<Self> {
        if finish <= start {
            return Err(SitelapseError::window("window finish must be after start"));
        }
        if total_frames <= 0 {
            return Err(SitelapseError::window("total_frames must be > 0"));
        }
        Ok(Self {
            start,
            finish,
            start_frame,
            total_frames,
        })
    }

    /// Inclusive frame range covered by the run.
    pub fn frame_span(&self) -> FrameSpan {
        FrameSpan::new(self.start_frame, self.start_frame + self.total_frames)
    }

    /// Calendar duration of the window.
    pub fn duration(&self) -> Duration {
        self.finish - self.start
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/window.rs"]
mod tests;
