//! Global capture hotkey and its listener thread

use std::thread::JoinHandle;

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};

/// Registered capture hotkey. Dropping it unregisters the key.
pub struct CaptureHotkey {
    _manager: GlobalHotKeyManager,
    hotkey: HotKey,
}

impl CaptureHotkey {
    pub fn id(&self) -> u32 {
        self.hotkey.id()
    }
}

/// Parse a shortcut string like "Alt+PrintScreen" into a `HotKey`.
pub fn parse_shortcut(s: &str) -> Result<HotKey> {
    let mut modifiers = Modifiers::empty();
    let mut key_code: Option<Code> = None;

    for token in s.split('+') {
        let token = token.trim();
        match token.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= Modifiers::CONTROL,
            "alt" => modifiers |= Modifiers::ALT,
            "shift" => modifiers |= Modifiers::SHIFT,
            "super" | "win" | "meta" | "cmd" => modifiers |= Modifiers::SUPER,
            _ => {
                if key_code.is_some() {
                    anyhow::bail!("multiple key codes in shortcut: {s:?}");
                }
                key_code = Some(parse_key_code(token)?);
            }
        }
    }

    let code = key_code.with_context(|| format!("no key code found in shortcut: {s:?}"))?;
    let mods = if modifiers.is_empty() { None } else { Some(modifiers) };
    Ok(HotKey::new(mods, code))
}

const LETTERS: [Code; 26] = [
    Code::KeyA,
    Code::KeyB,
    Code::KeyC,
    Code::KeyD,
    Code::KeyE,
    Code::KeyF,
    Code::KeyG,
    Code::KeyH,
    Code::KeyI,
    Code::KeyJ,
    Code::KeyK,
    Code::KeyL,
    Code::KeyM,
    Code::KeyN,
    Code::KeyO,
    Code::KeyP,
    Code::KeyQ,
    Code::KeyR,
    Code::KeyS,
    Code::KeyT,
    Code::KeyU,
    Code::KeyV,
    Code::KeyW,
    Code::KeyX,
    Code::KeyY,
    Code::KeyZ,
];

const DIGITS: [Code; 10] = [
    Code::Digit0,
    Code::Digit1,
    Code::Digit2,
    Code::Digit3,
    Code::Digit4,
    Code::Digit5,
    Code::Digit6,
    Code::Digit7,
    Code::Digit8,
    Code::Digit9,
];

const FUNCTION_KEYS: [Code; 12] = [
    Code::F1,
    Code::F2,
    Code::F3,
    Code::F4,
    Code::F5,
    Code::F6,
    Code::F7,
    Code::F8,
    Code::F9,
    Code::F10,
    Code::F11,
    Code::F12,
];

/// Map a key name to a `Code` variant.
fn parse_key_code(token: &str) -> Result<Code> {
    let lower = token.to_lowercase();

    let mut chars = lower.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if ch.is_ascii_lowercase() {
            return Ok(LETTERS[(ch as u8 - b'a') as usize]);
        }
        if ch.is_ascii_digit() {
            return Ok(DIGITS[(ch as u8 - b'0') as usize]);
        }
    }

    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(FUNCTION_KEYS[n - 1]);
        }
    }

    match lower.as_str() {
        "printscreen" | "prtscn" | "prtsc" | "print" => Ok(Code::PrintScreen),
        "space" => Ok(Code::Space),
        "enter" | "return" => Ok(Code::Enter),
        "tab" => Ok(Code::Tab),
        "escape" | "esc" => Ok(Code::Escape),
        "insert" | "ins" => Ok(Code::Insert),
        "delete" | "del" => Ok(Code::Delete),
        "home" => Ok(Code::Home),
        "end" => Ok(Code::End),
        "pageup" => Ok(Code::PageUp),
        "pagedown" => Ok(Code::PageDown),
        "pause" => Ok(Code::Pause),
        "scrolllock" => Ok(Code::ScrollLock),
        _ => anyhow::bail!("unknown key: {token:?}"),
    }
}

/// Register the configured hotkey, returning `None` if it cannot be used.
///
/// The manager must be created on the thread that runs the event loop.
pub fn register(shortcut: &str) -> Result<Option<CaptureHotkey>> {
    let hotkey = match parse_shortcut(shortcut) {
        Ok(h) => h,
        Err(e) => {
            log::warn!(
                "Invalid hotkey {:?}: {e}. Continuing without hotkey, \
                 set a valid one in config.json.",
                shortcut
            );
            return Ok(None);
        }
    };

    let manager = GlobalHotKeyManager::new().context("create hotkey manager")?;
    if let Err(e) = manager.register(hotkey) {
        log::warn!("Failed to register hotkey {:?}: {e}", shortcut);
        return Ok(None);
    }
    log::info!("Global capture hotkey registered: {}", shortcut);

    Ok(Some(CaptureHotkey {
        _manager: manager,
        hotkey,
    }))
}

/// True for a key-down of the hotkey with `id`
pub fn is_trigger(event: &GlobalHotKeyEvent, id: u32) -> bool {
    event.id == id && event.state == HotKeyState::Pressed
}

/// Forward presses of hotkey `id` to the UI thread, then call `wake` so the
/// UI notices. Exits when either channel closes.
pub fn spawn_listener<F>(id: u32, tx: Sender<()>, wake: F) -> std::io::Result<JoinHandle<()>>
where
    F: Fn() + Send + 'static,
{
    std::thread::Builder::new()
        .name("hotkey-listener".to_string())
        .spawn(move || {
            let events = GlobalHotKeyEvent::receiver();
            while let Ok(event) = events.recv() {
                if !is_trigger(&event, id) {
                    continue;
                }
                log::debug!("Capture hotkey pressed");
                if tx.send(()).is_err() {
                    break;
                }
                wake();
            }
            log::debug!("Hotkey listener stopped");
        })
}
