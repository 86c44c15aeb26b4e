//! Monitor layout and fit-to-screen placement.
//!
//! eframe only reports the size of the monitor the main window sits on, so
//! that monitor is always entry 0 at the origin. Additional monitors are
//! declared by the user (view → displays...) in the same point space.

use serde::{Deserialize, Serialize};

/// A monitor, in points, relative to the primary monitor's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, p: egui::Pos2) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    pub fn center(&self) -> egui::Pos2 {
        egui::pos2(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// Where and how large the presented image is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    pub fn position(&self) -> egui::Pos2 {
        egui::pos2(self.x, self.y)
    }

    pub fn size(&self) -> egui::Vec2 {
        egui::vec2(self.width as f32, self.height as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FitAxis {
    Height,
    Width,
}

fn scale_to(axis: FitAxis, image_w: u32, image_h: u32, screen: &DisplayRect) -> (u32, u32) {
    let (w, h) = (image_w as f64, image_h as f64);
    let (sw, sh) = (screen.width.max(0.0) as f64, screen.height.max(0.0) as f64);
    let (new_w, new_h) = match axis {
        FitAxis::Height => (w * sh / h, sh),
        FitAxis::Width => (sw, h * sw / w),
    };
    ((new_w.round() as u32).max(1), (new_h.round() as u32).max(1))
}

/// Scale an image to fill `screen` along one axis, preserving aspect ratio,
/// and centre it.
///
/// Landscape screens fit to height, portrait and square screens fit to
/// width. If that would push the other dimension past the screen edge the
/// other axis is used instead. Small images are scaled up.
pub fn fit_to_screen(image_w: u32, image_h: u32, screen: DisplayRect) -> Placement {
    if image_w == 0 || image_h == 0 || screen.width < 1.0 || screen.height < 1.0 {
        return Placement { x: screen.x, y: screen.y, width: 0, height: 0 };
    }

    let primary = if screen.is_landscape() { FitAxis::Height } else { FitAxis::Width };
    let (mut w, mut h) = scale_to(primary, image_w, image_h, &screen);

    let overflows = match primary {
        FitAxis::Height => w as f32 > screen.width,
        FitAxis::Width => h as f32 > screen.height,
    };
    if overflows {
        let other = match primary {
            FitAxis::Height => FitAxis::Width,
            FitAxis::Width => FitAxis::Height,
        };
        (w, h) = scale_to(other, image_w, image_h, &screen);
    }

    Placement {
        x: screen.x + ((screen.width - w as f32) / 2.0).floor(),
        y: screen.y + ((screen.height - h as f32) / 2.0).floor(),
        width: w,
        height: h,
    }
}

/// Ordered monitors; index 0 hosts the main window's reported monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayLayout {
    monitors: Vec<DisplayRect>,
}

impl DisplayLayout {
    pub fn new(primary_size: egui::Vec2, extra: &[DisplayRect]) -> Self {
        let mut monitors = vec![DisplayRect::new(0.0, 0.0, primary_size.x, primary_size.y)];
        monitors.extend_from_slice(extra);
        Self { monitors }
    }

    pub fn monitors(&self) -> &[DisplayRect] {
        &self.monitors
    }

    pub fn get(&self, index: usize) -> Option<&DisplayRect> {
        self.monitors.get(index)
    }

    /// Index of the monitor containing `point`, or the primary if none does.
    pub fn monitor_of(&self, point: egui::Pos2) -> usize {
        self.monitors.iter().position(|m| m.contains(point)).unwrap_or(0)
    }

    /// The first monitor other than `current`; `current` itself when alone.
    pub fn target_for(&self, current: usize) -> usize {
        (0..self.monitors.len()).find(|&i| i != current).unwrap_or(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HD: DisplayRect = DisplayRect { x: 0.0, y: 0.0, width: 1920.0, height: 1080.0 };

    #[test]
    fn landscape_screen_fits_height() {
        let p = fit_to_screen(800, 600, HD);
        assert_eq!((p.width, p.height), (1440, 1080));
        assert_eq!((p.x, p.y), (240.0, 0.0));
    }

    #[test]
    fn portrait_screen_fits_width() {
        let screen = DisplayRect::new(0.0, 0.0, 1080.0, 1920.0);
        let p = fit_to_screen(1000, 1500, screen);
        assert_eq!((p.width, p.height), (1080, 1620));
        assert_eq!((p.x, p.y), (0.0, 150.0));
    }

    #[test]
    fn panorama_on_landscape_switches_to_width() {
        let p = fit_to_screen(4000, 1000, HD);
        assert_eq!((p.width, p.height), (1920, 480));
        assert_eq!((p.x, p.y), (0.0, 300.0));
    }

    #[test]
    fn tall_image_on_portrait_switches_to_height() {
        let screen = DisplayRect::new(0.0, 0.0, 1080.0, 1920.0);
        let p = fit_to_screen(500, 2000, screen);
        assert_eq!((p.width, p.height), (480, 1920));
        assert_eq!(p.x, 300.0);
    }

    #[test]
    fn square_screen_fits_width() {
        let screen = DisplayRect::new(0.0, 0.0, 1000.0, 1000.0);
        let p = fit_to_screen(200, 100, screen);
        assert_eq!((p.width, p.height), (1000, 500));
    }

    #[test]
    fn placement_is_offset_by_monitor_origin() {
        let second = DisplayRect::new(1920.0, 0.0, 1280.0, 1024.0);
        let p = fit_to_screen(1024, 768, second);
        // 4:3 on 5:4 overflows the width when fitted to height
        assert_eq!((p.width, p.height), (1280, 960));
        assert_eq!((p.x, p.y), (1920.0, 32.0));
    }

    #[test]
    fn tiny_dimension_never_rounds_to_zero() {
        let p = fit_to_screen(10_000, 1, HD);
        assert_eq!(p.width, 1920);
        assert_eq!(p.height, 1);
    }

    #[test]
    fn degenerate_inputs_give_empty_placement() {
        assert_eq!(fit_to_screen(0, 100, HD).width, 0);
        let p = fit_to_screen(100, 100, DisplayRect::new(5.0, 6.0, 0.0, 0.0));
        assert_eq!((p.x, p.y, p.width, p.height), (5.0, 6.0, 0, 0));
    }

    #[test]
    fn target_prefers_another_monitor() {
        let layout = DisplayLayout::new(
            egui::vec2(1920.0, 1080.0),
            &[DisplayRect::new(1920.0, 0.0, 1280.0, 1024.0)],
        );
        assert_eq!(layout.target_for(0), 1);
        assert_eq!(layout.target_for(1), 0);
    }

    #[test]
    fn single_monitor_targets_itself() {
        let layout = DisplayLayout::new(egui::vec2(1920.0, 1080.0), &[]);
        assert_eq!(layout.target_for(0), 0);
    }

    #[test]
    fn monitor_of_uses_containment() {
        let layout = DisplayLayout::new(
            egui::vec2(1920.0, 1080.0),
            &[DisplayRect::new(1920.0, 0.0, 1280.0, 1024.0)],
        );
        assert_eq!(layout.monitor_of(egui::pos2(100.0, 100.0)), 0);
        assert_eq!(layout.monitor_of(egui::pos2(2000.0, 500.0)), 1);
        assert_eq!(layout.monitor_of(egui::pos2(-50.0, -50.0)), 0);
    }
}
