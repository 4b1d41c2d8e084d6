/// Straight-alpha RGBA color with channels in `[0, 1]`.
pub type ColorRgba = [f32; 4];

/// True when every channel is finite and within `[0, 1]`.
pub fn color_is_valid(color: &ColorRgba) -> bool {
    color.iter().all(|c| c.is_finite() && (0.0..=1.0).contains(c))
}

/// An inclusive frame interval; empty when `end < start`.
///
/// Phase arithmetic produces empty spans routinely (a task starting on the
/// first window frame has an empty before_start span), so emptiness is a
/// first-class state rather than an error.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameSpan {
    /// First frame of the span (inclusive).
    pub start: i64,
    /// Last frame of the span (inclusive).
    pub end: i64,
}

impl FrameSpan {
    /// Build a span; `end < start` yields an empty span.
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Canonical empty span anchored just before `frame`.
    pub fn empty_at(frame: i64) -> Self {
        Self {
            start: frame,
            end: frame - 1,
        }
    }

    /// Whether the span covers no frames.
    pub fn is_empty(self) -> bool {
        self.end < self.start
    }

    /// Number of frames covered; 0 when empty.
    pub fn len_frames(self) -> i64 {
        if self.is_empty() { 0 } else { self.end - self.start + 1 }
    }

    /// Whether `frame` falls inside the span.
    pub fn contains(self, frame: i64) -> bool {
        !self.is_empty() && self.start <= frame && frame <= self.end
    }

    /// Clamp `frame` into the span; empty spans return their anchor.
    pub fn clamp(self, frame: i64) -> i64 {
        if self.is_empty() {
            return self.start;
        }
        frame.clamp(self.start, self.end)
    }
}
