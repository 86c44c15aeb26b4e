//! slowShow application
//!
//! The main window holds the playlist. The selected slide is presented in a
//! borderless viewport on whichever display is not showing the main window.

use crate::display::{DisplayLayout, DisplayRect};
use crate::loader::Presentation;
use crate::playlist::{display_name, Playlist};
use crate::prefs::{Preferences, WindowGeometry};
use crate::scanner::{ScanEvent, Scanner};
use crate::thumbnail::{Thumbnail, ThumbnailCache, THUMBNAIL_EDGE};
use egui::{
    ColorImage, Context, Key, Rect, Sense, Stroke, TextureHandle, TextureOptions, Vec2,
    ViewportBuilder, ViewportClass, ViewportCommand, ViewportId,
};
use slowcore::dither;
use slowcore::repaint::RepaintController;
use slowcore::storage::{pictures_dir, DirectoryBrowser, StorageError};
use slowcore::theme::{menu_bar, SlowColors};
use slowcore::widgets::{status_bar, window_control_buttons, FolderListItem, SlowButton, WindowAction};
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::path::PathBuf;

/// Scan events applied per frame; keeps the UI responsive on large folders.
const EVENTS_PER_FRAME: usize = 16;

const ROW_HEIGHT: f32 = THUMBNAIL_EDGE as f32 + 8.0;

/// Message box contents.
struct Notice {
    title: &'static str,
    message: String,
}

/// The slide currently on the presentation display.
struct Shown {
    presentation: Presentation,
    texture: Option<TextureHandle>,
    monitor: usize,
}

pub struct SlowShowApp {
    repaint: RepaintController,
    prefs: Preferences,
    prefs_path: PathBuf,
    /// Preferences could not be read; the only way out is quit.
    fatal: Option<String>,
    playlist: Playlist,
    cache: ThumbnailCache,
    /// GPU copies of cached thumbnails, keyed like the cache.
    textures: HashMap<String, TextureHandle>,
    /// Files whose thumbnail could not be generated, with the reason.
    unreadable: HashMap<String, String>,
    scanner: Option<Scanner>,
    scan_generation: u64,
    status: String,
    notice: Option<Notice>,
    shown: Option<Shown>,
    scroll_to_selected: bool,
    /// Rows laid out by the playlist scroll area last frame.
    visible_rows: Range<usize>,
    show_dir_browser: bool,
    dir_browser: DirectoryBrowser,
    show_displays: bool,
    display_draft: Vec<DisplayRect>,
    show_about: bool,
    show_shortcuts: bool,
    /// Last observed main window geometry, saved on exit.
    geometry: Option<WindowGeometry>,
    exiting: bool,
}

impl SlowShowApp {
    pub fn new(prefs_path: PathBuf, prefs: Result<Preferences, StorageError>) -> Self {
        let (prefs, fatal) = match prefs {
            Ok(p) => (p, None),
            Err(e) => (
                Preferences::default(),
                Some(format!(
                    "Error loading preferences file {}:\n{}\n\nTry deleting the slowShow configuration directory and trying again.",
                    prefs_path.display(),
                    e
                )),
            ),
        };
        let browse_from = prefs.source_dir().unwrap_or_else(pictures_dir);

        let mut app = Self {
            repaint: RepaintController::new(),
            prefs,
            prefs_path,
            fatal,
            playlist: Playlist::default(),
            cache: ThumbnailCache::default(),
            textures: HashMap::new(),
            unreadable: HashMap::new(),
            scanner: None,
            scan_generation: 0,
            status: "Loading...".to_string(),
            notice: None,
            shown: None,
            scroll_to_selected: false,
            visible_rows: 0..0,
            show_dir_browser: false,
            dir_browser: DirectoryBrowser::new(browse_from),
            show_displays: false,
            display_draft: Vec::new(),
            show_about: false,
            show_shortcuts: false,
            geometry: None,
            exiting: false,
        };

        if app.fatal.is_none() {
            app.load_playlist();
        }
        app
    }

    // ---------------------------------------------------------------
    // playlist
    // ---------------------------------------------------------------

    /// (Re)scan the source directory. Cached thumbnails are reused.
    fn load_playlist(&mut self) {
        self.scanner = None;
        self.unreadable.clear();

        let Some(source) = self.prefs.source_dir() else {
            self.playlist.clear();
            self.status = "No source directory.".to_string();
            self.notice = Some(Notice {
                title: "no files loaded",
                message: "No image source directory is selected.\n\
                          Go to file → image source directory to select where your images will come from."
                    .to_string(),
            });
            return;
        };

        // The old list is stale until the new scan reports back.
        self.playlist.clear();
        self.status = "Loading...".to_string();
        self.scan_generation += 1;
        let known: HashSet<String> = self.cache.names().cloned().collect();
        match Scanner::start(source.clone(), known, self.scan_generation) {
            Ok(scanner) => {
                self.scanner = Some(scanner);
                self.repaint.set_continuous(true);
            }
            Err(e) => {
                log::error!("could not start scan of {}: {}", source.display(), e);
                self.status = format!("{}: scan failed", source.display());
                self.notice = Some(Notice {
                    title: "no files loaded",
                    message: format!("Could not read {}:\n{}", source.display(), e),
                });
            }
        }
    }

    fn choose_source_directory(&mut self, dir: PathBuf) {
        if self.prefs.source_dir().as_ref() != Some(&dir) {
            self.cache.clear();
            self.textures.clear();
        }
        self.prefs.set_source_directory(&dir);
        self.prefs.persist(&self.prefs_path);
        self.load_playlist();
    }

    fn drain_scanner(&mut self, ctx: &Context) {
        let Some(scanner) = self.scanner.as_mut() else {
            return;
        };
        let events = scanner.poll(EVENTS_PER_FRAME);
        let finished = scanner.is_finished();
        let generation = scanner.generation();
        if !events.is_empty() {
            self.repaint.mark_needs_repaint();
        }

        for event in events {
            match event {
                ScanEvent::Listed(files) => {
                    let source = self.prefs.source_dir().unwrap_or_default();
                    self.playlist.load(source.clone(), files);
                    self.status = self.playlist.status_text();
                    self.scroll_to_selected = true;
                    if self.playlist.is_empty() {
                        self.notice = Some(Notice {
                            title: "no files found",
                            message: format!(
                                "No valid image files were found in directory {}.\n\
                                 Add some files and go to file → refresh to reload the list.",
                                source.display()
                            ),
                        });
                    }
                }
                ScanEvent::Thumbnail { name, thumb, .. } => {
                    self.store_thumbnail(ctx, name, thumb);
                }
                ScanEvent::Failed { name, error, .. } => {
                    self.unreadable.insert(name, error);
                }
                ScanEvent::Finished => {
                    log::info!("scan #{} finished: {} thumbnails cached", generation, self.cache.len());
                }
            }
        }

        if finished {
            self.scanner = None;
            self.repaint.set_continuous(false);
        }
    }

    /// Cache a thumbnail and upload it; duplicates are dropped before upload.
    fn store_thumbnail(&mut self, ctx: &Context, name: String, thumb: Thumbnail) -> bool {
        if !self.cache.insert(&name, thumb) {
            return false;
        }
        let Some(thumb) = self.cache.get(&name) else {
            return false;
        };
        let image = ColorImage::from_rgba_unmultiplied(thumb.size(), thumb.pixels.as_raw());
        let texture = ctx.load_texture(format!("thumb_{}", name), image, TextureOptions::LINEAR);
        self.textures.insert(name, texture);
        true
    }

    // ---------------------------------------------------------------
    // presentation
    // ---------------------------------------------------------------

    fn display_layout(&self, ctx: &Context) -> DisplayLayout {
        let primary = ctx
            .input(|i| i.viewport().monitor_size)
            .unwrap_or_else(|| ctx.screen_rect().size());
        DisplayLayout::new(primary, &self.prefs.displays)
    }

    /// Present the selected slide on the display not showing this window.
    fn show_selected(&mut self, ctx: &Context) {
        let Some(path) = self.playlist.selected_path().map(|p| p.to_path_buf()) else {
            return;
        };

        let layout = self.display_layout(ctx);
        let window_center = ctx
            .input(|i| i.viewport().outer_rect.map(|r| r.center()))
            .unwrap_or_else(|| layout.monitors()[0].center());
        let current = layout.monitor_of(window_center);
        let target = layout.target_for(current);
        let Some(screen) = layout.get(target).copied() else {
            return;
        };

        self.hide_presentation();
        match Presentation::open(&path, screen, ctx.pixels_per_point()) {
            Ok(presentation) => {
                self.shown = Some(Shown {
                    presentation,
                    texture: None,
                    monitor: target,
                });
            }
            Err(e) => {
                log::error!("error displaying {}: {}", path.display(), e);
                self.notice = Some(Notice {
                    title: "error displaying image",
                    message: format!("Error displaying image {}\n\n{}", path.display(), e),
                });
            }
        }
    }

    fn hide_presentation(&mut self) {
        if let Some(shown) = self.shown.take() {
            log::info!("hiding {}", shown.presentation.path.display());
        }
    }

    fn render_presentation(&mut self, ctx: &Context) {
        let Some(shown) = self.shown.as_mut() else {
            return;
        };

        let placement = shown.presentation.placement;
        if shown.texture.is_none() {
            let pixels = &shown.presentation.pixels;
            let image = ColorImage::from_rgba_unmultiplied(
                [pixels.width() as usize, pixels.height() as usize],
                pixels.as_raw(),
            );
            shown.texture = Some(ctx.load_texture("slowshow_presentation", image, TextureOptions::LINEAR));
        }
        let Some(texture_id) = shown.texture.as_ref().map(|t| t.id()) else {
            return;
        };
        let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

        let builder = ViewportBuilder::default()
            .with_title("slowShow presentation")
            .with_decorations(false)
            .with_resizable(false)
            .with_position(placement.position())
            .with_inner_size(placement.size());

        let close = ctx.show_viewport_immediate(
            ViewportId::from_hash_of("slowshow_presentation"),
            builder,
            |ctx, class| {
                if matches!(class, ViewportClass::Embedded) {
                    // No multi-viewport support: fall back to an in-window preview.
                    egui::Window::new("presentation")
                        .collapsible(false)
                        .resizable(false)
                        .show(ctx, |ui| {
                            let (rect, _) = ui.allocate_exact_size(placement.size(), Sense::hover());
                            ui.painter().image(texture_id, rect, uv, egui::Color32::WHITE);
                        });
                } else {
                    egui::CentralPanel::default()
                        .frame(egui::Frame::none().fill(SlowColors::BLACK))
                        .show(ctx, |ui| {
                            ui.painter().image(texture_id, ui.max_rect(), uv, egui::Color32::WHITE);
                        });
                }
                ctx.input(|i| i.viewport().close_requested() || i.key_pressed(Key::Escape))
            },
        );

        if close {
            self.hide_presentation();
        }
    }

    // ---------------------------------------------------------------
    // window
    // ---------------------------------------------------------------

    fn track_geometry(&mut self, ctx: &Context) {
        let rects = ctx.input(|i| (i.viewport().outer_rect, i.viewport().inner_rect));
        if let (Some(outer), Some(inner)) = rects {
            self.geometry = Some(WindowGeometry {
                x: outer.min.x,
                y: outer.min.y,
                width: inner.width(),
                height: inner.height(),
            });
        }
    }

    /// Runs once when the main window is closing.
    fn save_on_exit(&mut self) {
        if self.exiting || self.fatal.is_some() {
            return;
        }
        self.exiting = true;
        if let Some(geometry) = self.geometry {
            self.prefs.window = Some(geometry);
        }
        self.prefs.persist(&self.prefs_path);
    }

    fn quit(&mut self, ctx: &Context) {
        self.hide_presentation();
        self.save_on_exit();
        ctx.send_viewport_cmd(ViewportCommand::Close);
    }

    fn dialog_open(&self) -> bool {
        self.fatal.is_some()
            || self.notice.is_some()
            || self.show_dir_browser
            || self.show_displays
            || self.show_about
            || self.show_shortcuts
    }

    fn open_dir_browser(&mut self) {
        let start = self.prefs.source_dir().unwrap_or_else(pictures_dir);
        self.dir_browser = DirectoryBrowser::new(start);
        self.show_dir_browser = true;
    }

    fn open_displays(&mut self) {
        self.display_draft = self.prefs.displays.clone();
        self.show_displays = true;
    }

    fn handle_keyboard(&mut self, ctx: &Context) {
        slowcore::theme::consume_special_keys(ctx);

        if self.dialog_open() {
            return;
        }

        let (up, down, show, hide, refresh, open) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            (
                i.key_pressed(Key::ArrowUp),
                i.key_pressed(Key::ArrowDown),
                i.key_pressed(Key::Enter) || i.key_pressed(Key::Space),
                i.key_pressed(Key::Escape),
                cmd && i.key_pressed(Key::R),
                cmd && i.key_pressed(Key::O),
            )
        });

        if up {
            self.playlist.select_prev();
            self.scroll_to_selected = true;
        }
        if down {
            self.playlist.select_next();
            self.scroll_to_selected = true;
        }
        if show {
            self.show_selected(ctx);
        }
        if hide {
            self.hide_presentation();
        }
        if refresh {
            self.load_playlist();
        }
        if open {
            self.open_dir_browser();
        }
    }

    // ---------------------------------------------------------------
    // rendering
    // ---------------------------------------------------------------

    fn render_menu_bar(&mut self, ui: &mut egui::Ui) -> WindowAction {
        let mut action = WindowAction::None;
        menu_bar(ui, |ui| {
            action = window_control_buttons(ui);
            ui.menu_button("file", |ui| {
                if ui.button("image source directory...  ⌘O").clicked() {
                    self.open_dir_browser();
                    ui.close_menu();
                }
                if ui.button("refresh                    ⌘R").clicked() {
                    self.load_playlist();
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("quit").clicked() {
                    action = WindowAction::Close;
                    ui.close_menu();
                }
            });
            ui.menu_button("view", |ui| {
                if ui.button("displays...").clicked() {
                    self.open_displays();
                    ui.close_menu();
                }
            });
            ui.menu_button("help", |ui| {
                if ui.button("keyboard shortcuts").clicked() {
                    self.show_shortcuts = true;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("about").clicked() {
                    self.show_about = true;
                    ui.close_menu();
                }
            });
        });
        action
    }

    fn render_playlist(&mut self, ui: &mut egui::Ui) {
        if self.playlist.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() / 3.0);
                if self.scanner.is_some() {
                    ui.label("scanning...");
                } else {
                    ui.label("no slides");
                    ui.small("file → image source directory to choose a folder");
                }
            });
            return;
        }

        let mut clicked = None;
        let mut double_clicked = None;
        let scroll_to = if self.scroll_to_selected { self.playlist.selected_index() } else { None };
        self.scroll_to_selected = false;

        let mut area = egui::ScrollArea::vertical().auto_shrink([false, false]);
        // show_rows only lays out rows in view, so rows outside it can't
        // scroll themselves into place; move the offset instead.
        if let Some(index) = scroll_to.filter(|i| !self.visible_rows.contains(i)) {
            let row = ROW_HEIGHT + ui.spacing().item_spacing.y;
            let offset = if index < self.visible_rows.start {
                index as f32 * row
            } else {
                ((index + 1) as f32 * row - ui.available_height()).max(0.0)
            };
            area = area.vertical_scroll_offset(offset);
        }

        let mut visible = 0..0;
        area.show_rows(ui, ROW_HEIGHT, self.playlist.len(), |ui, range| {
            visible = range.clone();
            for index in range {
                let path = &self.playlist.entries()[index];
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let selected = self.playlist.selected_index() == Some(index);

                let mut label = display_name(path);
                if let Some(thumb) = self.cache.get(&name) {
                    label = format!("{}   {}", label, thumb.dimensions_label());
                }
                let response = playlist_row(
                    ui,
                    self.textures.get(&name),
                    &label,
                    self.unreadable.get(&name).map(String::as_str),
                    selected,
                );
                if scroll_to == Some(index) {
                    response.scroll_to_me(None);
                }
                if response.clicked() {
                    clicked = Some(index);
                }
                if response.double_clicked() {
                    double_clicked = Some(index);
                }
            }
        });

        self.visible_rows = visible;

        if let Some(index) = clicked {
            self.playlist.select(index);
        }
        if let Some(index) = double_clicked {
            self.playlist.select(index);
            self.show_selected(ui.ctx());
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        ui.horizontal(|ui| {
            let can_show = self.playlist.selected_path().is_some();
            if ui.add(SlowButton::new("show").enabled(can_show)).clicked() {
                self.show_selected(&ctx);
            }
            if ui.add(SlowButton::new("hide").enabled(self.shown.is_some())).clicked() {
                self.hide_presentation();
            }
            if let Some(shown) = &self.shown {
                let shown_image = &shown.presentation;
                ui.small(format!(
                    "showing {} ({}x{}) on display {}",
                    display_name(&shown_image.path),
                    shown_image.original_width,
                    shown_image.original_height,
                    shown.monitor + 1
                ));
            }
        });
    }

    fn render_notice(&mut self, ctx: &Context) {
        let Some(notice) = &self.notice else {
            return;
        };
        let mut dismissed = false;
        let resp = egui::Window::new(notice.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.label(notice.message.as_str());
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("ok").clicked() {
                        dismissed = true;
                    }
                });
            });
        if let Some(r) = &resp {
            dither::draw_window_shadow(ctx, r.response.rect);
        }
        if dismissed || ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.notice = None;
        }
    }

    fn render_fatal(&mut self, ctx: &Context) {
        let Some(message) = self.fatal.clone() else {
            return;
        };
        let mut quit = false;
        let resp = egui::Window::new("error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    quit = ui.button("quit").clicked();
                });
            });
        if let Some(r) = &resp {
            dither::draw_window_shadow(ctx, r.response.rect);
        }
        if quit {
            self.quit(ctx);
        }
    }

    fn render_dir_browser(&mut self, ctx: &Context) {
        let mut chosen = None;
        let mut cancel = false;
        let resp = egui::Window::new("image source directory")
            .collapsible(false)
            .resizable(false)
            .default_width(450.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("location:");
                    ui.label(self.dir_browser.current_dir.to_string_lossy().to_string());
                });
                ui.separator();

                egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                    let mut clicked_idx = None;
                    let mut nav_path = None;
                    for (idx, entry) in self.dir_browser.entries.iter().enumerate() {
                        let selected = self.dir_browser.selected_index == Some(idx);
                        let response = ui.add(FolderListItem::new(&entry.name).selected(selected));
                        if response.clicked() {
                            clicked_idx = Some(idx);
                        }
                        if response.double_clicked() {
                            nav_path = Some(entry.path.clone());
                        }
                    }
                    if let Some(idx) = clicked_idx {
                        self.dir_browser.selected_index = Some(idx);
                    }
                    if let Some(path) = nav_path {
                        self.dir_browser.navigate_to(path);
                    }
                });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("cancel").clicked() {
                        cancel = true;
                    }
                    if ui.button("ok").clicked() {
                        chosen = Some(self.dir_browser.chosen_dir());
                    }
                });
            });
        if let Some(r) = &resp {
            dither::draw_window_shadow(ctx, r.response.rect);
        }

        if cancel || ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.show_dir_browser = false;
        }
        if let Some(dir) = chosen {
            self.show_dir_browser = false;
            self.choose_source_directory(dir);
        }
    }

    fn render_displays(&mut self, ctx: &Context) {
        let primary = self.display_layout(ctx).monitors()[0];
        let mut save = false;
        let mut cancel = false;
        let mut remove = None;

        let resp = egui::Window::new("displays")
            .collapsible(false)
            .resizable(false)
            .default_width(380.0)
            .show(ctx, |ui| {
                ui.label(format!(
                    "display 1 (this window): {}×{}",
                    primary.width as u32, primary.height as u32
                ));
                ui.small("other displays, in points relative to display 1's top-left corner:");
                ui.separator();

                for (i, rect) in self.display_draft.iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(format!("display {}", i + 2));
                        ui.add(egui::DragValue::new(&mut rect.x).prefix("x ").speed(1.0));
                        ui.add(egui::DragValue::new(&mut rect.y).prefix("y ").speed(1.0));
                        ui.add(egui::DragValue::new(&mut rect.width).prefix("w ").speed(1.0).clamp_range(1.0..=16384.0));
                        ui.add(egui::DragValue::new(&mut rect.height).prefix("h ").speed(1.0).clamp_range(1.0..=16384.0));
                        if ui.small_button("remove").clicked() {
                            remove = Some(i);
                        }
                    });
                }
                if ui.button("add display").clicked() {
                    // Default: a 1080p panel to the right of the last display
                    let right_edge = self
                        .display_draft
                        .iter()
                        .map(|d| d.x + d.width)
                        .fold(primary.width, f32::max);
                    self.display_draft.push(DisplayRect::new(right_edge, 0.0, 1920.0, 1080.0));
                }

                ui.separator();
                ui.horizontal(|ui| {
                    cancel = ui.button("cancel").clicked();
                    save = ui.button("save").clicked();
                });
            });
        if let Some(r) = &resp {
            dither::draw_window_shadow(ctx, r.response.rect);
        }

        if let Some(i) = remove {
            self.display_draft.remove(i);
        }
        if save {
            self.prefs.displays = std::mem::take(&mut self.display_draft);
            self.prefs.persist(&self.prefs_path);
            self.show_displays = false;
        }
        if cancel {
            self.show_displays = false;
        }
    }

    fn render_shortcuts(&mut self, ctx: &Context) {
        let resp = egui::Window::new("keyboard shortcuts")
            .collapsible(false)
            .resizable(false)
            .default_width(280.0)
            .show(ctx, |ui| {
                let shortcut = |ui: &mut egui::Ui, key: &str, desc: &str| {
                    ui.horizontal(|ui| {
                        ui.monospace(format!("{:<14}", key));
                        ui.label(desc);
                    });
                };

                ui.strong("playlist");
                shortcut(ui, "↑ / ↓", "previous / next slide");
                shortcut(ui, "Enter / Space", "show slide");
                shortcut(ui, "Esc", "hide slide");
                shortcut(ui, "double-click", "show slide");

                ui.add_space(6.0);
                ui.strong("file");
                shortcut(ui, "⌘O", "image source directory");
                shortcut(ui, "⌘R", "refresh");

                ui.separator();
                if ui.button("close").clicked() {
                    self.show_shortcuts = false;
                }
            });
        if let Some(r) = &resp {
            dither::draw_window_shadow(ctx, r.response.rect);
        }
    }

    fn render_about(&mut self, ctx: &Context) {
        let resp = egui::Window::new("about slowShow")
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("slowShow");
                    ui.label(format!("version {}", env!("CARGO_PKG_VERSION")));
                    ui.add_space(8.0);
                    ui.label("slideshows on a second display");
                });
                ui.add_space(8.0);
                ui.separator();
                ui.label("supported formats:");
                ui.label("  PNG, JPEG");
                ui.add_space(4.0);
                ui.label("frameworks:");
                ui.label("  egui/eframe (MIT), image-rs (MIT)");
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("ok").clicked() {
                        self.show_about = false;
                    }
                });
            });
        if let Some(r) = &resp {
            dither::draw_window_shadow(ctx, r.response.rect);
        }
    }
}

/// One playlist row: thumbnail on the left, label beside it.
fn playlist_row(
    ui: &mut egui::Ui,
    texture: Option<&TextureHandle>,
    label: &str,
    error: Option<&str>,
    selected: bool,
) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), ROW_HEIGHT),
        Sense::click(),
    );
    if !ui.is_rect_visible(rect) {
        return response;
    }

    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, SlowColors::WHITE);
    painter.hline(rect.x_range(), rect.bottom(), Stroke::new(1.0, SlowColors::BLACK));

    let edge = THUMBNAIL_EDGE as f32;
    let slot = Rect::from_min_size(rect.min + egui::vec2(4.0, 4.0), Vec2::splat(edge));
    match texture {
        Some(tex) => {
            let size = tex.size_vec2();
            let scale = (edge / size.x).min(edge / size.y).min(1.0);
            let drawn = Rect::from_center_size(slot.center(), size * scale);
            painter.image(
                tex.id(),
                drawn,
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            painter.rect_stroke(slot, 0.0, Stroke::new(1.0, SlowColors::BLACK));
            let glyph = if error.is_some() { "?" } else { "…" };
            painter.text(
                slot.center(),
                egui::Align2::CENTER_CENTER,
                glyph,
                egui::FontId::proportional(18.0),
                SlowColors::BLACK,
            );
        }
    }

    let text_rect = Rect::from_min_max(egui::pos2(slot.right() + 8.0, rect.top()), rect.max);
    let text_color = if selected {
        dither::draw_dither_selection(painter, text_rect);
        SlowColors::WHITE
    } else {
        if response.hovered() {
            dither::draw_dither_hover(painter, text_rect);
        }
        SlowColors::BLACK
    };
    painter.text(
        egui::pos2(text_rect.left() + 4.0, text_rect.center().y),
        egui::Align2::LEFT_CENTER,
        label,
        egui::FontId::proportional(14.0),
        text_color,
    );

    match error {
        Some(err) => response.on_hover_text(err),
        None => response,
    }
}

impl eframe::App for SlowShowApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.repaint.begin_frame();
        self.track_geometry(ctx);
        self.handle_keyboard(ctx);
        self.drain_scanner(ctx);

        let mut win_action = WindowAction::None;
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            win_action = self.render_menu_bar(ui);
        });
        match win_action {
            WindowAction::Close => self.quit(ctx),
            WindowAction::Minimize => ctx.send_viewport_cmd(ViewportCommand::Minimized(true)),
            WindowAction::None => {}
        }

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            status_bar(ui, &self.status);
        });

        egui::TopBottomPanel::bottom("controls")
            .frame(egui::Frame::none().fill(SlowColors::WHITE).inner_margin(egui::Margin::same(6.0)))
            .show(ctx, |ui| {
                self.render_controls(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(SlowColors::WHITE))
            .show(ctx, |ui| {
                self.render_playlist(ui);
            });

        if self.fatal.is_some() {
            self.render_fatal(ctx);
        } else if self.notice.is_some() {
            self.render_notice(ctx);
        }
        if self.show_dir_browser {
            self.render_dir_browser(ctx);
        }
        if self.show_displays {
            self.render_displays(ctx);
        }
        if self.show_about {
            self.render_about(ctx);
        }
        if self.show_shortcuts {
            self.render_shortcuts(ctx);
        }

        self.render_presentation(ctx);

        if ctx.input(|i| i.viewport().close_requested()) {
            self.hide_presentation();
            self.save_on_exit();
        }

        self.repaint.end_frame(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn app_for(dir: &std::path::Path) -> SlowShowApp {
        let mut prefs = Preferences::default();
        prefs.set_source_directory(dir);
        SlowShowApp::new(dir.join("prefs.json"), Ok(prefs))
    }

    fn thumb() -> Thumbnail {
        Thumbnail {
            pixels: RgbaImage::new(4, 3),
            original_width: 40,
            original_height: 30,
        }
    }

    #[test]
    fn duplicate_thumbnails_are_not_uploaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_for(dir.path());
        let ctx = Context::default();

        assert!(app.store_thumbnail(&ctx, "slide_1.png".into(), thumb()));
        assert!(!app.store_thumbnail(&ctx, "slide_1.png".into(), thumb()));
        assert_eq!(app.textures.len(), 1);
        assert_eq!(app.cache.len(), 1);
    }

    #[test]
    fn refresh_empties_the_stale_playlist() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_for(dir.path());
        app.playlist.load(dir.path().to_path_buf(), vec![dir.path().join("old_1.png")]);
        assert!(app.playlist.selected_path().is_some());

        app.load_playlist();
        assert!(app.playlist.is_empty());
        assert!(app.playlist.selected_path().is_none());
        assert_eq!(app.status, "Loading...");
    }

    #[test]
    fn missing_source_shows_a_notice() {
        let app = SlowShowApp::new(std::path::PathBuf::from("prefs.json"), Ok(Preferences::default()));
        assert_eq!(app.status, "No source directory.");
        assert!(matches!(&app.notice, Some(n) if n.title == "no files loaded"));
    }
}
