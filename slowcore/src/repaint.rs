//! Repaint governor for e-ink friendly apps.
//!
//! egui redraws everything each frame. On an e-ink panel every refresh is
//! visible, so apps should only repaint when something actually changed:
//!
//! 1. **Input**: the user clicked, typed or scrolled. egui wakes on its own.
//! 2. **State change**: a background worker delivered results. The app calls
//!    [`RepaintController::mark_needs_repaint`] and one repaint is issued.
//! 3. **Busy**: a worker is still producing results. The app calls
//!    [`RepaintController::set_continuous`] and frames run at a governed rate
//!    so the app keeps polling.
//!
//! Anything else is idle and costs nothing.

use std::time::Duration;

/// Default interval while continuous mode is active (~4 Hz).
const DEFAULT_REPAINT_INTERVAL: Duration = Duration::from_millis(250);

/// Drop this into the app struct. Call [`begin_frame`](Self::begin_frame) at
/// the top of `update()` and [`end_frame`](Self::end_frame) at the bottom.
pub struct RepaintController {
    continuous: bool,
    needs_repaint: bool,
    interval: Duration,
}

impl Default for RepaintController {
    fn default() -> Self {
        Self::new()
    }
}

impl RepaintController {
    pub fn new() -> Self {
        Self {
            continuous: false,
            needs_repaint: false,
            interval: DEFAULT_REPAINT_INTERVAL,
        }
    }

    /// Use a custom interval for continuous mode.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::new()
        }
    }

    /// Keep frames coming at the configured interval until switched off.
    pub fn set_continuous(&mut self, continuous: bool) {
        self.continuous = continuous;
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// Request a single repaint at the end of this frame.
    pub fn mark_needs_repaint(&mut self) {
        self.needs_repaint = true;
    }

    /// Forget last frame's request. Call before any UI code runs.
    pub fn begin_frame(&mut self) {
        self.needs_repaint = false;
    }

    /// Schedule the next frame, if any.
    pub fn end_frame(&self, ctx: &egui::Context) {
        if self.needs_repaint {
            ctx.request_repaint();
        } else if self.continuous {
            ctx.request_repaint_after(self.interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repaint_request_lasts_one_frame() {
        let mut rc = RepaintController::new();
        rc.mark_needs_repaint();
        assert!(rc.needs_repaint);
        rc.begin_frame();
        assert!(!rc.needs_repaint);
    }

    #[test]
    fn continuous_mode_survives_frames() {
        let mut rc = RepaintController::with_interval(Duration::from_millis(10));
        rc.set_continuous(true);
        rc.begin_frame();
        rc.end_frame(&egui::Context::default());
        assert!(rc.is_continuous());
        rc.set_continuous(false);
        assert!(!rc.is_continuous());
    }
}
