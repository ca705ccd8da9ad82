use eframe::egui::{Key, Modifiers};

use crate::config::PaletteColour;
use crate::session::messages::Msg;

/// Which window has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutContext {
    Selecting,
    Annotating,
}

pub fn handle_key_event(context: ShortcutContext, key: Key, modifiers: Modifiers) -> Option<Msg> {
    match context {
        ShortcutContext::Selecting => match key {
            Key::Escape => Some(Msg::cancel_selection()),
            _ => None,
        },
        ShortcutContext::Annotating => match key {
            Key::Z if modifiers.command && !modifiers.shift => Some(Msg::undo()),
            Key::S if modifiers.command => Some(Msg::save()),
            Key::H if !modifiers.command => Some(Msg::toggle_highlight()),
            Key::Escape => Some(Msg::CloseAnnotation),
            // 1-6 pick palette colours in menu order
            Key::Num1 => Some(Msg::set_colour(PaletteColour::ALL[0])),
            Key::Num2 => Some(Msg::set_colour(PaletteColour::ALL[1])),
            Key::Num3 => Some(Msg::set_colour(PaletteColour::ALL[2])),
            Key::Num4 => Some(Msg::set_colour(PaletteColour::ALL[3])),
            Key::Num5 => Some(Msg::set_colour(PaletteColour::ALL[4])),
            Key::Num6 => Some(Msg::set_colour(PaletteColour::ALL[5])),
            _ => None,
        },
    }
}
