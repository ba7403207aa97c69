use std::cell::Cell;

/// Bounding geometry of the scroll reference section, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionRect {
    /// Distance from the viewport top to the section top. Negative once the
    /// section has started scrolling past.
    pub top: f64,
    pub height: f64,
}

/// How far `section` has scrolled past the viewport, normalized to `[0, 1]`.
///
/// A missing section contributes nothing. The denominator floors at one pixel
/// so sections shorter than the viewport still yield a finite value.
pub fn scroll_progress(section: Option<SectionRect>, viewport_height: f64) -> f32 {
    let Some(section) = section else {
        return 0.0;
    };

    let travel = (section.height - viewport_height).max(1.0);
    let progress = -section.top / travel;

    if progress.is_nan() {
        return 0.0;
    }

    progress.clamp(0.0, 1.0) as f32
}

/// Scroll-derived rotation offset in radians.
///
/// Written by the scroll listener, read by the frame callback. Both run on the
/// same event loop thread; `Cell` keeps this type `!Sync` so it can't leak onto
/// another thread. A multi-threaded host would need a channel instead.
#[derive(Debug)]
pub struct ScrollRotation {
    offset: Cell<f32>,
    range: f32,
}

impl ScrollRotation {
    pub fn new(range: f32) -> Self {
        Self {
            offset: Cell::new(0.0),
            range,
        }
    }

    pub fn update(&self, section: Option<SectionRect>, viewport_height: f64) {
        self.offset
            .set(scroll_progress(section, viewport_height) * self.range);
    }

    pub fn offset(&self) -> f32 {
        self.offset.get()
    }
}
