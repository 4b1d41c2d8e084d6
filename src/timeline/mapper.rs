use chrono::NaiveDateTime;

use crate::timeline::window::VizWindow;

/// Map a calendar date to a frame inside the window's frame range.
///
/// Linear interpolation over the window's calendar span, rounded to the
/// nearest frame and clamped to `[start_frame, start_frame + total_frames]`.
/// Monotonic non-decreasing in `date`.
pub fn map_date_to_frame(date: NaiveDateTime, window: &VizWindow) -> i64 {
    let span = window.frame_span();
    // Window validation rules out a zero-length range; guard the division
    // anyway so a hand-built window degrades instead of dividing by zero.
    let total_secs = (window.finish - window.start).num_seconds().max(1) as f64;
    let offset_secs = (date - window.start).num_seconds() as f64;
    let frame =
        window.start_frame as f64 + (offset_secs / total_secs) * window.total_frames as f64;
    span.clamp(frame.round() as i64)
}
