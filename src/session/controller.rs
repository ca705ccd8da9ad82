//! Session lifecycle: at most one selection and one annotation session
//!
//! The windowing adapter feeds every input as a [`Msg`] and acts on the
//! returned [`Effect`]. Dropping a session drops its buffers.

use super::messages::{Effect, Msg, SaveMsg, SelectMsg};
use super::selector::RegionSelector;
use super::state::{AnnotationSession, SelectionSession};
use crate::annotations::AnnotationCanvas;
use crate::annotations::handlers::handle_draw_msg;
use crate::capture::{self, CapturedFrame, DisplayBackend};
use crate::config::SnipConfig;
use crate::domain::CropBox;
use crate::export;

pub struct SessionController {
    backend: Box<dyn DisplayBackend>,
    config: SnipConfig,
    selection: Option<SelectionSession>,
    annotation: Option<AnnotationSession>,
}

impl SessionController {
    pub fn new(backend: Box<dyn DisplayBackend>, config: SnipConfig) -> Self {
        Self {
            backend,
            config,
            selection: None,
            annotation: None,
        }
    }

    pub fn config(&self) -> &SnipConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<&SelectionSession> {
        self.selection.as_ref()
    }

    pub fn annotation(&self) -> Option<&AnnotationSession> {
        self.annotation.as_ref()
    }

    /// Handle one message from the adapter
    pub fn update(&mut self, msg: Msg) -> Effect {
        match msg {
            Msg::Trigger => self.start_capture(),
            Msg::Select(msg) => self.handle_select(msg),
            Msg::Draw(msg) => {
                let alpha = self.config.highlight_alpha;
                let Some(session) = self.annotation.as_mut() else {
                    return Effect::None;
                };
                if handle_draw_msg(&mut session.canvas, msg, alpha) {
                    Effect::Redraw
                } else {
                    Effect::None
                }
            }
            Msg::Save(msg) => self.handle_save(msg),
            Msg::CloseAnnotation => {
                if self.annotation.take().is_some() {
                    log::info!("Annotation window closed");
                    Effect::CloseAnnotationWindow
                } else {
                    Effect::None
                }
            }
        }
    }

    fn start_capture(&mut self) -> Effect {
        if self.selection.is_some() {
            log::debug!("Capture already in progress, ignoring trigger");
            return Effect::None;
        }

        let captured = capture::resolve(self.backend.as_ref()).and_then(|layout| {
            capture::capture(self.backend.as_ref(), &layout).map(|frame| (layout.desktop, frame))
        });
        match captured {
            Ok((desktop, frame)) => {
                self.selection = Some(SelectionSession {
                    selector: RegionSelector::new(desktop),
                    frame,
                });
                Effect::OpenSelectionOverlay(desktop)
            }
            Err(err) => {
                log::error!("Capture failed: {}", err);
                Effect::Error(err.to_string())
            }
        }
    }

    fn handle_select(&mut self, msg: SelectMsg) -> Effect {
        let Some(session) = self.selection.as_mut() else {
            return Effect::None;
        };
        match msg {
            SelectMsg::PointerDown(at) => {
                session.selector.pointer_down(at);
                Effect::Redraw
            }
            SelectMsg::PointerMove(at) => {
                if session.selector.pointer_move(at) {
                    Effect::Redraw
                } else {
                    Effect::None
                }
            }
            SelectMsg::PointerUp(at) => {
                let crop = session.selector.pointer_up(at);
                // The overlay is torn down whatever the outcome
                let Some(session) = self.selection.take() else {
                    return Effect::None;
                };
                match crop {
                    Some(crop) => self.open_annotation(session.frame, crop),
                    None => Effect::CloseSelectionOverlay,
                }
            }
            SelectMsg::Cancel => {
                session.selector.cancel();
                self.selection = None;
                log::info!("Selection cancelled");
                Effect::CloseSelectionOverlay
            }
        }
    }

    fn open_annotation(&mut self, frame: CapturedFrame, crop: CropBox) -> Effect {
        let snip = frame.crop(crop);
        let captured_at = frame.captured_at;
        drop(frame);

        let Some(canvas) = AnnotationCanvas::new(
            snip,
            self.config.initial_colour(),
            self.config.stroke_width,
        ) else {
            return Effect::CloseSelectionOverlay;
        };

        if self.annotation.is_some() {
            log::info!("Replacing previous annotation window");
        }
        let (width, height) = (canvas.width(), canvas.height());
        self.annotation = Some(AnnotationSession {
            canvas,
            captured_at,
        });
        Effect::OpenAnnotationWindow { width, height }
    }

    fn handle_save(&mut self, msg: SaveMsg) -> Effect {
        let Some(session) = self.annotation.as_ref() else {
            return Effect::None;
        };
        match msg {
            SaveMsg::Request => Effect::ChooseSavePath(export::suggested_path(session.captured_at)),
            SaveMsg::PathChosen(path) => {
                let path = export::ensure_jpeg_extension(path);
                let flat = session.canvas.flatten();
                match export::save_jpeg(&flat, &path, self.config.jpeg_quality) {
                    Ok(()) => Effect::Saved(path),
                    Err(err) => {
                        log::error!("Failed to save snip: {}", err);
                        Effect::Error(err.to_string())
                    }
                }
            }
            SaveMsg::Cancelled => {
                log::debug!("Save dialog dismissed");
                Effect::None
            }
        }
    }
}
