use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use eframe::egui;
use eframe::egui::viewport::WindowLevel;

use crate::capture::XcapBackend;
use crate::config::{HighlightColour, PaletteColour, SnipConfig};
use crate::domain::{ImagePoint, ScreenPoint, VirtualDesktop, WindowPoint};
use crate::export;
use crate::hotkey::{self, CaptureHotkey};
use crate::render::geometry::selection;
use crate::session::shortcuts::{ShortcutContext, handle_key_event};
use crate::session::{Effect, Msg, SessionController};

const APP_TITLE: &str = "Snipmark";

/// Time for the window to disappear before the desktop is grabbed
const CAPTURE_DELAY: Duration = Duration::from_millis(150);

const LAUNCHER_SIZE: [f32; 2] = [340.0, 150.0];
const MAX_ANNOTATION_SIZE: [f32; 2] = [1400.0, 900.0];
/// Room for the status bar and scrollbars around the snip
const ANNOTATION_CHROME: [f32; 2] = [24.0, 56.0];

pub(crate) fn run(config: SnipConfig, hotkey: Option<CaptureHotkey>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(LAUNCHER_SIZE)
            .with_title(APP_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, config, hotkey)))),
    )
    .map_err(|e| anyhow::anyhow!("event loop failed: {e}"))
}

/// Which window the single viewport is currently acting as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Launcher,
    Selecting,
    Annotating,
}

pub struct App {
    controller: SessionController,
    view: View,
    /// Kept alive so the hotkey stays registered
    _hotkey: Option<CaptureHotkey>,
    hotkey_label: Option<String>,
    hotkey_rx: Receiver<()>,
    /// Capture is delayed until the window has been hidden
    pending_capture: Option<Instant>,
    frame_texture: Option<egui::TextureHandle>,
    snip_texture: Option<egui::TextureHandle>,
    last_stroke_point: Option<ImagePoint>,
    status: Option<String>,
}

/// Context menu inputs, snapshotted before the menu borrows the UI
struct MenuState {
    highlight_on: bool,
    can_undo: bool,
    colour: HighlightColour,
    alpha: u8,
}

impl App {
    fn new(cc: &eframe::CreationContext<'_>, config: SnipConfig, hotkey: Option<CaptureHotkey>) -> Self {
        let (tx, hotkey_rx) = crossbeam_channel::unbounded();
        let hotkey_label = hotkey.as_ref().map(|_| config.hotkey.clone());

        if let Some(hk) = &hotkey {
            let ctx = cc.egui_ctx.clone();
            if let Err(e) = hotkey::spawn_listener(hk.id(), tx, move || ctx.request_repaint()) {
                log::warn!("Failed to start hotkey listener: {e}");
            }
        }

        Self {
            controller: SessionController::new(Box::new(XcapBackend::default()), config),
            view: View::Launcher,
            _hotkey: hotkey,
            hotkey_label,
            hotkey_rx,
            pending_capture: None,
            frame_texture: None,
            snip_texture: None,
            last_stroke_point: None,
            status: None,
        }
    }

    /// Hide the window and schedule the grab
    fn request_capture(&mut self, ctx: &egui::Context) {
        if self.controller.selection().is_some() || self.pending_capture.is_some() {
            log::debug!("Capture already in progress");
            return;
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
        self.pending_capture = Some(Instant::now() + CAPTURE_DELAY);
        ctx.request_repaint_after(CAPTURE_DELAY);
    }

    fn poll_capture(&mut self, ctx: &egui::Context) {
        if self.hotkey_rx.try_iter().count() > 0 {
            self.request_capture(ctx);
        }

        let Some(due) = self.pending_capture else {
            return;
        };
        let now = Instant::now();
        if now < due {
            ctx.request_repaint_after(due - now);
            return;
        }
        self.pending_capture = None;
        let effect = self.controller.update(Msg::Trigger);
        if matches!(effect, Effect::Error(_) | Effect::None) {
            // Nothing to show; bring back whatever was visible before
            self.restore_view(ctx);
        }
        self.apply(ctx, effect);
    }

    fn dispatch(&mut self, ctx: &egui::Context, msg: Msg) {
        let effect = self.controller.update(msg);
        self.apply(ctx, effect);
    }

    fn apply(&mut self, ctx: &egui::Context, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::OpenSelectionOverlay(desktop) => {
                self.upload_frame(ctx);
                self.enter_selecting(ctx, desktop);
            }
            Effect::CloseSelectionOverlay => {
                self.frame_texture = None;
                self.restore_view(ctx);
            }
            Effect::OpenAnnotationWindow { width, height } => {
                self.frame_texture = None;
                self.last_stroke_point = None;
                self.status = None;
                self.refresh_snip(ctx);
                self.enter_annotating(ctx, width, height);
            }
            Effect::CloseAnnotationWindow => {
                self.snip_texture = None;
                self.enter_launcher(ctx);
            }
            Effect::Redraw => {
                self.refresh_snip(ctx);
                ctx.request_repaint();
            }
            Effect::ChooseSavePath(suggested) => {
                let msg = match export::choose_save_path(&suggested) {
                    Some(path) => Msg::save_to(path),
                    None => Msg::save_cancelled(),
                };
                self.dispatch(ctx, msg);
            }
            Effect::Saved(path) => {
                self.status = Some(format!("Saved {}", path.display()));
            }
            Effect::Error(err) => {
                self.status = Some(err);
            }
        }
    }

    /// Back to the annotation window if one is open, else the launcher
    fn restore_view(&mut self, ctx: &egui::Context) {
        match self.controller.annotation() {
            Some(session) => {
                let (w, h) = (session.canvas.width(), session.canvas.height());
                self.enter_annotating(ctx, w, h);
            }
            None => self.enter_launcher(ctx),
        }
    }

    fn enter_selecting(&mut self, ctx: &egui::Context, desktop: VirtualDesktop) {
        let ppp = ctx.pixels_per_point();
        self.view = View::Selecting;
        ctx.send_viewport_cmd(egui::ViewportCommand::Decorations(false));
        ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(WindowLevel::AlwaysOnTop));
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
            desktop.origin.x as f32 / ppp,
            desktop.origin.y as f32 / ppp,
        )));
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
            desktop.width as f32 / ppp,
            desktop.height as f32 / ppp,
        )));
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        log::info!(
            "Selection overlay over {}x{} at ({}, {})",
            desktop.width,
            desktop.height,
            desktop.origin.x,
            desktop.origin.y
        );
    }

    fn enter_annotating(&mut self, ctx: &egui::Context, width: u32, height: u32) {
        let ppp = ctx.pixels_per_point();
        self.view = View::Annotating;
        let size = egui::vec2(
            (width as f32 / ppp + ANNOTATION_CHROME[0]).min(MAX_ANNOTATION_SIZE[0]),
            (height as f32 / ppp + ANNOTATION_CHROME[1]).min(MAX_ANNOTATION_SIZE[1]),
        );
        ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(WindowLevel::Normal));
        ctx.send_viewport_cmd(egui::ViewportCommand::Decorations(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size));
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
            "{APP_TITLE} - {width}x{height}"
        )));
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
    }

    fn enter_launcher(&mut self, ctx: &egui::Context) {
        self.view = View::Launcher;
        ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(WindowLevel::Normal));
        ctx.send_viewport_cmd(egui::ViewportCommand::Decorations(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(LAUNCHER_SIZE.into()));
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(APP_TITLE.to_string()));
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
    }

    fn upload_frame(&mut self, ctx: &egui::Context) {
        let Some(session) = self.controller.selection() else {
            return;
        };
        let image = &session.frame.image;
        let color_image = egui::ColorImage::from_rgb(
            [image.width() as usize, image.height() as usize],
            image.as_raw(),
        );
        self.frame_texture =
            Some(ctx.load_texture("desktop_frame", color_image, egui::TextureOptions::NEAREST));
    }

    fn refresh_snip(&mut self, ctx: &egui::Context) {
        let Some(session) = self.controller.annotation() else {
            return;
        };
        let flat = session.canvas.flatten();
        let color_image = egui::ColorImage::from_rgb(
            [flat.width() as usize, flat.height() as usize],
            flat.as_raw(),
        );
        match self.snip_texture.as_mut() {
            Some(texture) => texture.set(color_image, egui::TextureOptions::NEAREST),
            None => {
                self.snip_texture =
                    Some(ctx.load_texture("snip", color_image, egui::TextureOptions::NEAREST));
            }
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let context = match self.view {
            View::Selecting => ShortcutContext::Selecting,
            View::Annotating => ShortcutContext::Annotating,
            View::Launcher => return,
        };
        let keys: Vec<(egui::Key, egui::Modifiers)> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        modifiers,
                        ..
                    } => Some((*key, *modifiers)),
                    _ => None,
                })
                .collect()
        });
        for (key, modifiers) in keys {
            if let Some(msg) = handle_key_event(context, key, modifiers) {
                self.dispatch(ctx, msg);
            }
        }
    }

    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.viewport().close_requested()) {
            return;
        }
        match self.view {
            View::Launcher => log::info!("Exiting"),
            View::Selecting => {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                self.dispatch(ctx, Msg::cancel_selection());
            }
            View::Annotating => {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                self.dispatch(ctx, Msg::CloseAnnotation);
            }
        }
    }

    fn launcher_ui(&mut self, ctx: &egui::Context) {
        let mut capture = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(APP_TITLE);
            match &self.hotkey_label {
                Some(label) => ui.label(format!("Press {label} to take a snip.")),
                None => ui.label("Global hotkey unavailable, use the button below."),
            };
            ui.add_space(8.0);
            capture = ui.button("New snip").clicked();
            if let Some(status) = &self.status {
                ui.add_space(4.0);
                ui.label(status);
            }
        });
        if capture {
            self.request_capture(ctx);
        }
    }

    fn selecting_ui(&mut self, ctx: &egui::Context) {
        let Some(session) = self.controller.selection() else {
            return;
        };
        let desktop = *session.selector.desktop();
        let live = session.selector.live_rect(desktop.origin);
        let ppp = ctx.pixels_per_point();
        let dim = egui::Color32::from_black_alpha(
            (self.controller.config().selection_dim * 255.0).round() as u8,
        );

        let panel_rect = egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let painter = ui.painter();
                if let Some(texture) = &self.frame_texture {
                    painter.image(
                        texture.id(),
                        rect,
                        egui::Rect::from_min_max(egui::Pos2::ZERO, egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                match live {
                    Some(sel) => {
                        let area = egui::Rect::from_min_max(
                            rect.min + egui::vec2(sel.left as f32, sel.top as f32) / ppp,
                            rect.min + egui::vec2(sel.right as f32, sel.bottom as f32) / ppp,
                        );
                        for band in dim_bands(rect, area) {
                            painter.rect_filled(band, 0.0, dim);
                        }
                        let [r, g, b] = selection::OUTLINE_RGB;
                        painter.rect_stroke(
                            area,
                            0.0,
                            egui::Stroke::new(
                                selection::OUTLINE_WIDTH / ppp,
                                egui::Color32::from_rgb(r, g, b),
                            ),
                            egui::StrokeKind::Outside,
                        );
                    }
                    None => {
                        painter.rect_filled(rect, 0.0, dim);
                    }
                }
                rect
            })
            .inner;
        ctx.set_cursor_icon(egui::CursorIcon::Crosshair);

        let (pressed, down, released, pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        let Some(pos) = pos else {
            return;
        };
        let at = overlay_to_screen(pos, panel_rect.min, desktop.origin, ppp);
        // A fast click can press and release within one frame
        if pressed {
            self.dispatch(ctx, Msg::pointer_down(at));
        }
        if released {
            self.dispatch(ctx, Msg::pointer_up(at));
        } else if down && !pressed {
            self.dispatch(ctx, Msg::pointer_move(at));
        }
    }

    fn annotating_ui(&mut self, ctx: &egui::Context) {
        let Some(session) = self.controller.annotation() else {
            return;
        };
        let ppp = ctx.pixels_per_point();
        let canvas = &session.canvas;
        let size = egui::vec2(canvas.width() as f32 / ppp, canvas.height() as f32 / ppp);
        let menu = MenuState {
            highlight_on: canvas.highlight_mode(),
            can_undo: !canvas.history().is_empty(),
            colour: canvas.colour(),
            alpha: self.controller.config().highlight_alpha,
        };
        let stroking = canvas.is_stroking();
        let status_line = session.status_line();

        let mut msgs = Vec::new();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(status_line);
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });

        let (image_rect, hovered) = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::both()
                    .show(ui, |ui| {
                        let (rect, response) =
                            ui.allocate_exact_size(size, egui::Sense::click_and_drag());
                        if let Some(texture) = &self.snip_texture {
                            ui.painter().image(
                                texture.id(),
                                rect,
                                egui::Rect::from_min_max(egui::Pos2::ZERO, egui::pos2(1.0, 1.0)),
                                egui::Color32::WHITE,
                            );
                        }
                        response.context_menu(|ui| context_menu(ui, &menu, &mut msgs));
                        (rect, response.hovered())
                    })
                    .inner
            })
            .inner;

        if menu.highlight_on && hovered {
            ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        let (pressed, down, pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.interact_pos(),
            )
        });
        let point = pos.map(|p| canvas_to_image(p, image_rect.min, ppp));

        if !stroking {
            if pressed && hovered && menu.highlight_on {
                msgs.push(Msg::stroke_start());
                if let Some(p) = point {
                    msgs.push(Msg::stroke_move(p.x, p.y));
                }
                self.last_stroke_point = point;
            }
        } else if down {
            if let Some(p) = point.filter(|p| Some(*p) != self.last_stroke_point) {
                msgs.push(Msg::stroke_move(p.x, p.y));
                self.last_stroke_point = Some(p);
            }
        } else {
            self.last_stroke_point = None;
            msgs.push(Msg::stroke_end());
        }

        for msg in msgs {
            self.dispatch(ctx, msg);
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_capture(ctx);
        self.handle_close_request(ctx);
        self.handle_keys(ctx);

        match self.view {
            View::Launcher => self.launcher_ui(ctx),
            View::Selecting => self.selecting_ui(ctx),
            View::Annotating => self.annotating_ui(ctx),
        }
    }
}

fn context_menu(ui: &mut egui::Ui, menu: &MenuState, msgs: &mut Vec<Msg>) {
    if ui
        .selectable_label(menu.highlight_on, "Toggle Highlighter")
        .clicked()
    {
        msgs.push(Msg::toggle_highlight());
        ui.close_menu();
    }
    if ui
        .add_enabled(menu.can_undo, egui::Button::new("Undo Last Highlight"))
        .clicked()
    {
        msgs.push(Msg::undo());
        ui.close_menu();
    }
    if ui.button("Save as JPG").clicked() {
        msgs.push(Msg::save());
        ui.close_menu();
    }
    ui.separator();
    ui.add_enabled_ui(menu.highlight_on, |ui| {
        ui.menu_button("Highlighter Colour", |ui| {
            for colour in PaletteColour::ALL {
                let selected = colour.colour(menu.alpha) == menu.colour;
                if ui.selectable_label(selected, colour.label()).clicked() {
                    msgs.push(Msg::set_colour(colour));
                    ui.close_menu();
                }
            }
        });
    });
}

/// Overlay pointer position (points) to absolute screen pixels
fn overlay_to_screen(pos: egui::Pos2, panel_min: egui::Pos2, origin: ScreenPoint, ppp: f32) -> ScreenPoint {
    let local = (pos - panel_min) * ppp;
    WindowPoint::new(local.x.round() as i32, local.y.round() as i32).to_screen(origin)
}

/// Canvas pointer position (points) to snip pixels
fn canvas_to_image(pos: egui::Pos2, image_min: egui::Pos2, ppp: f32) -> ImagePoint {
    let local = (pos - image_min) * ppp;
    ImagePoint::new(local.x, local.y)
}

/// The four bands of `screen` around `area`: above, left, right, below
fn dim_bands(screen: egui::Rect, area: egui::Rect) -> [egui::Rect; 4] {
    [
        egui::Rect::from_min_max(screen.min, egui::pos2(screen.max.x, area.min.y)),
        egui::Rect::from_min_max(
            egui::pos2(screen.min.x, area.min.y),
            egui::pos2(area.min.x, area.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(area.max.x, area.min.y),
            egui::pos2(screen.max.x, area.max.y),
        ),
        egui::Rect::from_min_max(egui::pos2(screen.min.x, area.max.y), screen.max),
    ]
}
