//! Custom widgets — pure black and white, dithered overlays

use crate::dither;
use crate::theme::SlowColors;
use egui::{Response, Stroke, Ui, Widget};

/// Action returned by window control buttons
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowAction {
    None,
    Close,
    Minimize,
}

fn control_box(ui: &mut Ui, draw_glyph: impl FnOnce(&egui::Painter, egui::Rect)) -> Response {
    let (rect, resp) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::click());
    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        painter.rect_filled(rect, 0.0, SlowColors::WHITE);
        painter.rect_stroke(rect, 0.0, Stroke::new(1.0, SlowColors::BLACK));
        if resp.hovered() {
            dither::draw_dither_hover(painter, rect);
        }
        draw_glyph(painter, rect.shrink(3.0));
    }
    resp
}

/// Draw close and minimize buttons at the left of the menu bar.
/// Call this at the start of your `menu_bar` closure.
pub fn window_control_buttons(ui: &mut Ui) -> WindowAction {
    let pen = Stroke::new(1.0, SlowColors::BLACK);
    let mut action = WindowAction::None;

    let close = control_box(ui, |p, r| {
        p.line_segment([r.left_top(), r.right_bottom()], pen);
        p.line_segment([r.right_top(), r.left_bottom()], pen);
    });
    if close.clicked() {
        action = WindowAction::Close;
    }

    ui.add_space(2.0);

    let minimize = control_box(ui, |p, r| {
        p.hline(r.x_range(), r.center().y, pen);
    });
    if minimize.clicked() {
        action = WindowAction::Minimize;
    }

    ui.add_space(4.0);
    toolbar_separator(ui);
    action
}

/// A button: white bg, 1px outline. Dithered when pressed, hatched when disabled.
pub struct SlowButton<'a> {
    text: &'a str,
    enabled: bool,
}

impl<'a> SlowButton<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, enabled: true }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl<'a> Widget for SlowButton<'a> {
    fn ui(self, ui: &mut Ui) -> Response {
        let font = egui::FontId::proportional(14.0);
        let galley = ui.painter().layout_no_wrap(self.text.to_string(), font.clone(), SlowColors::BLACK);
        let desired = egui::vec2(galley.size().x + 32.0, ui.spacing().interact_size.y);
        let sense = if self.enabled { egui::Sense::click() } else { egui::Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(desired, sense);

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.rect_filled(rect, 0.0, SlowColors::WHITE);
            painter.rect_stroke(rect, 0.0, Stroke::new(1.0, SlowColors::BLACK));

            let pressed = self.enabled && response.is_pointer_button_down_on();
            if pressed {
                dither::draw_dither_selection(painter, rect);
            } else if self.enabled && response.hovered() {
                dither::draw_dither_hover(painter, rect);
            }

            let text_color = if pressed { SlowColors::WHITE } else { SlowColors::BLACK };
            painter.text(rect.center(), egui::Align2::CENTER_CENTER, self.text, font, text_color);

            if !self.enabled {
                // Disabled: strike through the label
                painter.hline(
                    rect.left() + 10.0..=rect.right() - 10.0,
                    rect.center().y,
                    Stroke::new(1.0, SlowColors::BLACK),
                );
            }
        }

        response
    }
}

/// Vertical 1px black line after the window controls
fn toolbar_separator(ui: &mut Ui) {
    let height = ui.spacing().interact_size.y;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(8.0, height), egui::Sense::hover());

    if ui.is_rect_visible(rect) {
        ui.painter().vline(
            rect.center().x,
            rect.y_range(),
            Stroke::new(1.0, SlowColors::BLACK),
        );
    }
}

/// Status bar: white bg, 1px black top border
pub fn status_bar(ui: &mut Ui, text: &str) {
    egui::Frame::none()
        .fill(SlowColors::WHITE)
        .stroke(Stroke::new(1.0, SlowColors::BLACK))
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.small(text);
        });
}

/// Folder row for directory pickers.
pub struct FolderListItem<'a> {
    name: &'a str,
    selected: bool,
}

impl<'a> FolderListItem<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name, selected: false }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl<'a> Widget for FolderListItem<'a> {
    fn ui(self, ui: &mut Ui) -> Response {
        let height = 20.0;
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), height),
            egui::Sense::click(),
        );

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.rect_filled(rect, 0.0, SlowColors::WHITE);

            let text_color = if self.selected {
                dither::draw_dither_selection(painter, rect);
                SlowColors::WHITE
            } else {
                if response.hovered() {
                    dither::draw_dither_hover(painter, rect);
                }
                SlowColors::BLACK
            };

            painter.text(
                egui::pos2(rect.min.x + 12.0, rect.center().y),
                egui::Align2::CENTER_CENTER,
                "📁",
                egui::FontId::proportional(12.0),
                text_color,
            );
            painter.text(
                egui::pos2(rect.min.x + 24.0, rect.center().y),
                egui::Align2::LEFT_CENTER,
                self.name,
                egui::FontId::proportional(12.0),
                text_color,
            );
        }

        response
    }
}
