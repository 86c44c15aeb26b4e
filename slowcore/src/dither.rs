//! Checkerboard dithering for highlights and shadows.
//!
//! The display has two colors, so translucency is faked by painting every
//! other pixel. Content underneath stays readable through the pattern.

use egui::{Color32, Painter, Pos2, Rect, Vec2};

/// Paint a checkerboard of 1px dots over `rect`.
///
/// `spacing` is the distance between dots on a row; rows alternate their
/// starting offset so the dots interlock. A spacing of 1 gives the densest
/// pattern (half the pixels), 2 gives a quarter, and so on.
pub fn draw_dither_rect(painter: &Painter, rect: Rect, color: Color32, spacing: u32) {
    let spacing = spacing.max(1) as i32;

    // Only whole pixels strictly inside the rect are painted.
    let left = rect.min.x.ceil() as i32;
    let top = rect.min.y.ceil() as i32;
    let right = rect.max.x.floor() as i32;
    let bottom = rect.max.y.floor() as i32;
    if left >= right || top >= bottom {
        return;
    }

    let dot = Vec2::splat(1.0);
    for (row, y) in (top..bottom).step_by(spacing as usize).enumerate() {
        let shift = if row % 2 == 0 { 0 } else { spacing };
        for x in ((left + shift)..right).step_by((spacing * 2) as usize) {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(x as f32, y as f32), dot),
                0.0,
                color,
            );
        }
    }
}

/// Selected rows and pressed buttons.
pub fn draw_dither_selection(painter: &Painter, rect: Rect) {
    draw_dither_rect(painter, rect, Color32::BLACK, 1);
}

/// Hovered rows and buttons.
pub fn draw_dither_hover(painter: &Painter, rect: Rect) {
    draw_dither_rect(painter, rect, Color32::BLACK, 2);
}

/// Drop shadow offset 4px below and right of a dialog window.
/// Call after `egui::Window::show()` with the window's rect.
pub fn draw_window_shadow(ctx: &egui::Context, window_rect: Rect) {
    let shadow = window_rect.translate(Vec2::splat(4.0));
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::PanelResizeLine,
        egui::Id::new("dither_shadows"),
    ));
    draw_dither_rect(&painter, shadow, Color32::BLACK, 2);
}
