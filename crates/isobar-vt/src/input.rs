//! Input encoder: key/char/mouse events -> xterm-compatible byte sequences.
//!
//! The [`InputGenerator`] turns host input events into the exact byte
//! sequences a terminal application expects on its pty:
//!
//! - cursor keys switch between `CSI` and `SS3` forms with the cursor-key
//!   mode, and carry the VT220 extended-modifier parameter when modified
//! - function keys use `SS3 P..S` (F1-F4) and `CSI code ~` (F5-F12)
//! - the numpad follows the application-keypad `SS3` table when enabled
//! - `Control` masks characters into C0 range, `Alt` prefixes `ESC`
//!
//! Generated bytes accumulate in a pending buffer retrieved with
//! [`InputGenerator::swap`] or [`InputGenerator::take`].

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier bitmask.
    ///
    /// The numeric values follow the xterm extended-modifier convention so
    /// that `1 + bits()` is directly the CSI modifier parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct Modifier: u8 {
        const SHIFT = 1;
        const ALT = 2;
        const CONTROL = 4;
        const META = 8;
    }
}

impl Modifier {
    /// The CSI modifier parameter for this mask (`1 + bitmask`).
    #[must_use]
    pub fn virtual_terminal_param(self) -> u8 {
        1 + self.bits()
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let mut first = true;
        for (name, flag) in [
            ("Shift", Modifier::SHIFT),
            ("Alt", Modifier::ALT),
            ("Control", Modifier::CONTROL),
            ("Meta", Modifier::META),
        ] {
            if self.contains(flag) {
                if !first {
                    f.write_str("+")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Non-character keys known to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    // C0 keys
    Enter,
    Backspace,
    Tab,
    Escape,

    // function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // cursor keys
    DownArrow,
    LeftArrow,
    RightArrow,
    UpArrow,

    // 6-key editing pad
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    // numpad keys
    NumpadNumLock,
    NumpadDivide,
    NumpadMultiply,
    NumpadSubtract,
    NumpadCapsLock,
    NumpadAdd,
    NumpadDecimal,
    NumpadEnter,
    NumpadEqual,
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
}

/// Canonical key names, usable both directions (config files use the
/// string form, the encoder the enum form).
pub const KEY_NAMES: &[(&str, Key)] = &[
    ("Enter", Key::Enter),
    ("Backspace", Key::Backspace),
    ("Tab", Key::Tab),
    ("Escape", Key::Escape),
    ("F1", Key::F1),
    ("F2", Key::F2),
    ("F3", Key::F3),
    ("F4", Key::F4),
    ("F5", Key::F5),
    ("F6", Key::F6),
    ("F7", Key::F7),
    ("F8", Key::F8),
    ("F9", Key::F9),
    ("F10", Key::F10),
    ("F11", Key::F11),
    ("F12", Key::F12),
    ("DownArrow", Key::DownArrow),
    ("LeftArrow", Key::LeftArrow),
    ("RightArrow", Key::RightArrow),
    ("UpArrow", Key::UpArrow),
    ("Insert", Key::Insert),
    ("Delete", Key::Delete),
    ("Home", Key::Home),
    ("End", Key::End),
    ("PageUp", Key::PageUp),
    ("PageDown", Key::PageDown),
    ("Numpad_NumLock", Key::NumpadNumLock),
    ("Numpad_Divide", Key::NumpadDivide),
    ("Numpad_Multiply", Key::NumpadMultiply),
    ("Numpad_Subtract", Key::NumpadSubtract),
    ("Numpad_CapsLock", Key::NumpadCapsLock),
    ("Numpad_Add", Key::NumpadAdd),
    ("Numpad_Decimal", Key::NumpadDecimal),
    ("Numpad_Enter", Key::NumpadEnter),
    ("Numpad_Equal", Key::NumpadEqual),
    ("Numpad_0", Key::Numpad0),
    ("Numpad_1", Key::Numpad1),
    ("Numpad_2", Key::Numpad2),
    ("Numpad_3", Key::Numpad3),
    ("Numpad_4", Key::Numpad4),
    ("Numpad_5", Key::Numpad5),
    ("Numpad_6", Key::Numpad6),
    ("Numpad_7", Key::Numpad7),
    ("Numpad_8", Key::Numpad8),
    ("Numpad_9", Key::Numpad9),
];

/// Look up a key by its canonical name.
#[must_use]
pub fn parse_key(name: &str) -> Option<Key> {
    KEY_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, key)| key)
}

/// Look up a single modifier flag by name.
#[must_use]
pub fn parse_modifier_key(name: &str) -> Option<Modifier> {
    match name {
        "Shift" => Some(Modifier::SHIFT),
        "Alt" => Some(Modifier::ALT),
        "Control" => Some(Modifier::CONTROL),
        "Meta" => Some(Modifier::META),
        _ => None,
    }
}

impl Key {
    /// The canonical name of this key.
    #[must_use]
    pub fn name(self) -> &'static str {
        // Table covers every variant; the fallback is unreachable but keeps
        // the lookup total.
        KEY_NAMES
            .iter()
            .find(|(_, k)| *k == self)
            .map_or("", |&(name, _)| name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-device keypad mode (DECCKM / DECKPAM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyMode {
    #[default]
    Normal,
    Application,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInputEvent {
    pub key: Key,
    pub modifier: Modifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharInputEvent {
    pub value: char,
    pub modifier: Modifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    WheelUp,
    WheelDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MousePressEvent {
    pub button: MouseButton,
    pub modifier: Modifier,
}

/// A single host input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Key(KeyInputEvent),
    Char(CharInputEvent),
    MousePress(MousePressEvent),
}

impl InputEvent {
    #[must_use]
    pub fn modifier(&self) -> Modifier {
        match self {
            InputEvent::Key(e) => e.modifier,
            InputEvent::Char(e) => e.modifier,
            InputEvent::MousePress(e) => e.modifier,
        }
    }

    fn variant_index(&self) -> u8 {
        match self {
            InputEvent::Key(_) => 0,
            InputEvent::Char(_) => 1,
            InputEvent::MousePress(_) => 2,
        }
    }
}

/// Ordering for binding tables: modifier first, then the variant-specific
/// payload, then the variant index as a tie-break.
impl Ord for InputEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.modifier()
            .cmp(&other.modifier())
            .then_with(|| match (self, other) {
                (InputEvent::Key(a), InputEvent::Key(b)) => a.key.cmp(&b.key),
                (InputEvent::Char(a), InputEvent::Char(b)) => a.value.cmp(&b.value),
                (InputEvent::MousePress(a), InputEvent::MousePress(b)) => a.button.cmp(&b.button),
                _ => self.variant_index().cmp(&other.variant_index()),
            })
    }
}

impl PartialOrd for InputEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Encoder from input events to pty bytes.
///
/// ```
/// use isobar_vt::input::{InputGenerator, Key, Modifier};
///
/// let mut input = InputGenerator::new();
/// assert!(input.generate_key(Key::UpArrow, Modifier::empty()));
/// assert_eq!(input.take(), b"\x1b[A");
/// ```
#[derive(Debug, Default)]
pub struct InputGenerator {
    cursor_keys_mode: KeyMode,
    numpad_keys_mode: KeyMode,
    pending: Vec<u8>,
}

impl InputGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the input mode for cursor keys (DECCKM).
    pub fn set_cursor_keys_mode(&mut self, mode: KeyMode) {
        self.cursor_keys_mode = mode;
    }

    /// Changes the input mode for numpad keys (DECKPAM/DECKPNM).
    pub fn set_numpad_keys_mode(&mut self, mode: KeyMode) {
        self.numpad_keys_mode = mode;
    }

    /// Convenience for the `ESC =` / `ESC >` keypad-mode toggle.
    pub fn set_application_keypad_mode(&mut self, enable: bool) {
        self.numpad_keys_mode = if enable {
            KeyMode::Application
        } else {
            KeyMode::Normal
        };
    }

    #[must_use]
    pub fn cursor_keys_mode(&self) -> KeyMode {
        self.cursor_keys_mode
    }

    #[must_use]
    pub fn numpad_keys_mode(&self) -> KeyMode {
        self.numpad_keys_mode
    }

    /// Encode one event; returns whether any bytes were produced.
    pub fn generate(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::Key(e) => self.generate_key(e.key, e.modifier),
            InputEvent::Char(e) => self.generate_char(e.value, e.modifier),
            // Mouse reporting is driven by the decoder side; no bytes here.
            InputEvent::MousePress(_) => false,
        }
    }

    /// Encode a printable character with modifiers.
    pub fn generate_char(&mut self, ch: char, modifier: Modifier) -> bool {
        if modifier.contains(Modifier::ALT) {
            self.pending.push(0x1b);
        }
        if modifier.contains(Modifier::CONTROL) && ch == ' ' {
            self.pending.push(0x00);
        } else if modifier.contains(Modifier::CONTROL) && ch.is_ascii() {
            // Control masks the upper-cased ASCII value into C0 range.
            let upper = ch.to_ascii_uppercase();
            if ('@'..='~').contains(&upper) {
                self.pending.push(upper as u8 & 0x1f);
            } else {
                self.push_char(ch);
            }
        } else {
            self.push_char(ch);
        }
        true
    }

    /// Encode a non-character key with modifiers.
    pub fn generate_key(&mut self, key: Key, modifier: Modifier) -> bool {
        match key {
            Key::Enter => self.emit_c0(b'\r', modifier),
            Key::Backspace => self.emit_c0(0x7f, modifier),
            Key::Tab => {
                if modifier == Modifier::SHIFT {
                    self.append(b"\x1b[Z");
                    true
                } else {
                    self.emit_c0(b'\t', modifier)
                }
            }
            Key::Escape => self.emit_c0(0x1b, modifier),

            Key::UpArrow => self.emit_cursor(b'A', modifier),
            Key::DownArrow => self.emit_cursor(b'B', modifier),
            Key::RightArrow => self.emit_cursor(b'C', modifier),
            Key::LeftArrow => self.emit_cursor(b'D', modifier),
            Key::Home => self.emit_cursor(b'H', modifier),
            Key::End => self.emit_cursor(b'F', modifier),

            Key::F1 => self.emit_function_ss3(b'P', modifier),
            Key::F2 => self.emit_function_ss3(b'Q', modifier),
            Key::F3 => self.emit_function_ss3(b'R', modifier),
            Key::F4 => self.emit_function_ss3(b'S', modifier),
            Key::F5 => self.emit_function_tilde(15, modifier),
            Key::F6 => self.emit_function_tilde(17, modifier),
            Key::F7 => self.emit_function_tilde(18, modifier),
            Key::F8 => self.emit_function_tilde(19, modifier),
            Key::F9 => self.emit_function_tilde(20, modifier),
            Key::F10 => self.emit_function_tilde(21, modifier),
            Key::F11 => self.emit_function_tilde(23, modifier),
            Key::F12 => self.emit_function_tilde(24, modifier),

            Key::Insert => self.emit_function_tilde(2, modifier),
            Key::Delete => self.emit_function_tilde(3, modifier),
            Key::PageUp => self.emit_function_tilde(5, modifier),
            Key::PageDown => self.emit_function_tilde(6, modifier),

            Key::NumpadNumLock | Key::NumpadCapsLock => false,
            Key::NumpadDivide => self.emit_numpad(b'o', b'/'),
            Key::NumpadMultiply => self.emit_numpad(b'j', b'*'),
            Key::NumpadSubtract => self.emit_numpad(b'm', b'-'),
            Key::NumpadAdd => self.emit_numpad(b'k', b'+'),
            Key::NumpadDecimal => self.emit_numpad(b'n', b'.'),
            Key::NumpadEnter => self.emit_numpad(b'M', b'\r'),
            Key::NumpadEqual => self.emit_numpad(b'X', b'='),
            Key::Numpad0 => self.emit_numpad(b'p', b'0'),
            Key::Numpad1 => self.emit_numpad(b'q', b'1'),
            Key::Numpad2 => self.emit_numpad(b'r', b'2'),
            Key::Numpad3 => self.emit_numpad(b's', b'3'),
            Key::Numpad4 => self.emit_numpad(b't', b'4'),
            Key::Numpad5 => self.emit_numpad(b'u', b'5'),
            Key::Numpad6 => self.emit_numpad(b'v', b'6'),
            Key::Numpad7 => self.emit_numpad(b'w', b'7'),
            Key::Numpad8 => self.emit_numpad(b'x', b'8'),
            Key::Numpad9 => self.emit_numpad(b'y', b'9'),
        }
    }

    /// Moves out the accumulated byte sequence, leaving `target`'s previous
    /// content (cleared) as the new accumulation buffer.
    pub fn swap(&mut self, target: &mut Vec<u8>) {
        std::mem::swap(&mut self.pending, target);
        self.pending.clear();
    }

    /// Drains the accumulated byte sequence.
    #[must_use]
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    // ── encoding helpers ───────────────────────────────────────────

    fn append(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    fn push_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.append(ch.encode_utf8(&mut buf).as_bytes());
    }

    fn emit_c0(&mut self, byte: u8, modifier: Modifier) -> bool {
        if modifier.contains(Modifier::ALT) {
            self.pending.push(0x1b);
        }
        self.pending.push(byte);
        true
    }

    /// Cursor keys and Home/End: mode selects CSI vs SS3 when unmodified,
    /// any modifier forces the extended `CSI 1;m X` form.
    fn emit_cursor(&mut self, final_byte: u8, modifier: Modifier) -> bool {
        if modifier.is_empty() {
            match self.cursor_keys_mode {
                KeyMode::Normal => self.append(&[0x1b, b'[', final_byte]),
                KeyMode::Application => self.append(&[0x1b, b'O', final_byte]),
            }
        } else {
            let m = modifier.virtual_terminal_param();
            self.append(format!("\x1b[1;{m}").as_bytes());
            self.pending.push(final_byte);
        }
        true
    }

    fn emit_function_ss3(&mut self, final_byte: u8, modifier: Modifier) -> bool {
        if modifier.is_empty() {
            self.append(&[0x1b, b'O', final_byte]);
        } else {
            let m = modifier.virtual_terminal_param();
            self.append(format!("\x1b[1;{m}").as_bytes());
            self.pending.push(final_byte);
        }
        true
    }

    fn emit_function_tilde(&mut self, code: u8, modifier: Modifier) -> bool {
        if modifier.is_empty() {
            self.append(format!("\x1b[{code}~").as_bytes());
        } else {
            let m = modifier.virtual_terminal_param();
            self.append(format!("\x1b[{code};{m}~").as_bytes());
        }
        true
    }

    fn emit_numpad(&mut self, application_final: u8, numeric: u8) -> bool {
        match self.numpad_keys_mode {
            KeyMode::Application => self.append(&[0x1b, b'O', application_final]),
            KeyMode::Normal => self.pending.push(numeric),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode_key(key: Key, modifier: Modifier) -> Vec<u8> {
        let mut input = InputGenerator::new();
        assert!(input.generate_key(key, modifier));
        input.take()
    }

    fn encode_char(ch: char, modifier: Modifier) -> Vec<u8> {
        let mut input = InputGenerator::new();
        assert!(input.generate_char(ch, modifier));
        input.take()
    }

    // ── cursor keys ────────────────────────────────────────────────

    #[test]
    fn cursor_keys_normal_mode() {
        assert_eq!(encode_key(Key::UpArrow, Modifier::empty()), b"\x1b[A");
        assert_eq!(encode_key(Key::DownArrow, Modifier::empty()), b"\x1b[B");
        assert_eq!(encode_key(Key::RightArrow, Modifier::empty()), b"\x1b[C");
        assert_eq!(encode_key(Key::LeftArrow, Modifier::empty()), b"\x1b[D");
    }

    #[test]
    fn cursor_keys_application_mode() {
        let mut input = InputGenerator::new();
        input.set_cursor_keys_mode(KeyMode::Application);
        assert!(input.generate_key(Key::UpArrow, Modifier::empty()));
        assert_eq!(input.take(), b"\x1bOA");
    }

    #[test]
    fn modified_cursor_key_uses_extended_form_in_both_modes() {
        for mode in [KeyMode::Normal, KeyMode::Application] {
            let mut input = InputGenerator::new();
            input.set_cursor_keys_mode(mode);
            assert!(input.generate_key(Key::UpArrow, Modifier::CONTROL));
            assert_eq!(input.take(), b"\x1b[1;5A");
        }
    }

    #[test]
    fn modifier_parameter_is_one_plus_bitmask() {
        assert_eq!(encode_key(Key::LeftArrow, Modifier::SHIFT), b"\x1b[1;2D");
        assert_eq!(
            encode_key(Key::LeftArrow, Modifier::SHIFT | Modifier::ALT),
            b"\x1b[1;4D"
        );
        assert_eq!(
            encode_key(
                Key::LeftArrow,
                Modifier::SHIFT | Modifier::ALT | Modifier::CONTROL
            ),
            b"\x1b[1;8D"
        );
    }

    #[test]
    fn home_and_end() {
        assert_eq!(encode_key(Key::Home, Modifier::empty()), b"\x1b[H");
        assert_eq!(encode_key(Key::End, Modifier::empty()), b"\x1b[F");
        assert_eq!(encode_key(Key::Home, Modifier::CONTROL), b"\x1b[1;5H");
    }

    // ── function keys ──────────────────────────────────────────────

    #[test]
    fn f1_to_f4_use_ss3() {
        assert_eq!(encode_key(Key::F1, Modifier::empty()), b"\x1bOP");
        assert_eq!(encode_key(Key::F4, Modifier::empty()), b"\x1bOS");
    }

    #[test]
    fn modified_f1_switches_to_csi() {
        assert_eq!(encode_key(Key::F1, Modifier::SHIFT), b"\x1b[1;2P");
    }

    #[test]
    fn f5_to_f12_tilde_codes() {
        assert_eq!(encode_key(Key::F5, Modifier::empty()), b"\x1b[15~");
        assert_eq!(encode_key(Key::F6, Modifier::empty()), b"\x1b[17~");
        assert_eq!(encode_key(Key::F10, Modifier::empty()), b"\x1b[21~");
        assert_eq!(encode_key(Key::F11, Modifier::empty()), b"\x1b[23~");
        assert_eq!(encode_key(Key::F12, Modifier::empty()), b"\x1b[24~");
    }

    #[test]
    fn modified_tilde_key_inserts_parameter() {
        assert_eq!(encode_key(Key::F5, Modifier::CONTROL), b"\x1b[15;5~");
        assert_eq!(encode_key(Key::Delete, Modifier::SHIFT), b"\x1b[3;2~");
    }

    #[test]
    fn editing_pad_codes() {
        assert_eq!(encode_key(Key::Insert, Modifier::empty()), b"\x1b[2~");
        assert_eq!(encode_key(Key::Delete, Modifier::empty()), b"\x1b[3~");
        assert_eq!(encode_key(Key::PageUp, Modifier::empty()), b"\x1b[5~");
        assert_eq!(encode_key(Key::PageDown, Modifier::empty()), b"\x1b[6~");
    }

    // ── C0 keys ────────────────────────────────────────────────────

    #[test]
    fn c0_keys() {
        assert_eq!(encode_key(Key::Enter, Modifier::empty()), b"\r");
        assert_eq!(encode_key(Key::Tab, Modifier::empty()), b"\t");
        assert_eq!(encode_key(Key::Escape, Modifier::empty()), b"\x1b");
        assert_eq!(encode_key(Key::Backspace, Modifier::empty()), b"\x7f");
    }

    #[test]
    fn shift_tab_is_backtab() {
        assert_eq!(encode_key(Key::Tab, Modifier::SHIFT), b"\x1b[Z");
    }

    #[test]
    fn alt_prefixes_c0_keys() {
        assert_eq!(encode_key(Key::Enter, Modifier::ALT), b"\x1b\r");
    }

    // ── characters ─────────────────────────────────────────────────

    #[test]
    fn plain_characters_pass_through_utf8() {
        assert_eq!(encode_char('a', Modifier::empty()), b"a");
        assert_eq!(encode_char('é', Modifier::empty()), "é".as_bytes());
    }

    #[test]
    fn control_masks_into_c0() {
        assert_eq!(encode_char('a', Modifier::CONTROL), b"\x01");
        assert_eq!(encode_char('A', Modifier::CONTROL), b"\x01");
        assert_eq!(encode_char('[', Modifier::CONTROL), b"\x1b");
        assert_eq!(encode_char(' ', Modifier::CONTROL), b"\x00");
    }

    #[test]
    fn alt_prefixes_characters() {
        assert_eq!(encode_char('x', Modifier::ALT), b"\x1bx");
        assert_eq!(
            encode_char('c', Modifier::ALT | Modifier::CONTROL),
            b"\x1b\x03"
        );
    }

    // ── numpad ─────────────────────────────────────────────────────

    #[test]
    fn numpad_numeric_mode_is_plain_ascii() {
        assert_eq!(encode_key(Key::Numpad5, Modifier::empty()), b"5");
        assert_eq!(encode_key(Key::NumpadAdd, Modifier::empty()), b"+");
        assert_eq!(encode_key(Key::NumpadEnter, Modifier::empty()), b"\r");
    }

    #[test]
    fn numpad_application_mode_uses_ss3() {
        let mut input = InputGenerator::new();
        input.set_application_keypad_mode(true);
        assert!(input.generate_key(Key::Numpad0, Modifier::empty()));
        assert!(input.generate_key(Key::NumpadMultiply, Modifier::empty()));
        assert!(input.generate_key(Key::NumpadEnter, Modifier::empty()));
        assert_eq!(input.take(), b"\x1bOp\x1bOj\x1bOM");
    }

    #[test]
    fn lock_keys_produce_nothing() {
        let mut input = InputGenerator::new();
        assert!(!input.generate_key(Key::NumpadNumLock, Modifier::empty()));
        assert!(input.pending().is_empty());
    }

    // ── events, buffering ──────────────────────────────────────────

    #[test]
    fn mouse_press_is_not_encodable() {
        let mut input = InputGenerator::new();
        let event = InputEvent::MousePress(MousePressEvent {
            button: MouseButton::Left,
            modifier: Modifier::empty(),
        });
        assert!(!input.generate(&event));
        assert!(input.pending().is_empty());
    }

    #[test]
    fn swap_drains_pending_bytes() {
        let mut input = InputGenerator::new();
        assert!(input.generate_char('h', Modifier::empty()));
        assert!(input.generate_char('i', Modifier::empty()));
        let mut out = Vec::new();
        input.swap(&mut out);
        assert_eq!(out, b"hi");
        assert!(input.pending().is_empty());
    }

    // ── ordering ───────────────────────────────────────────────────

    #[test]
    fn event_ordering_is_modifier_first() {
        let plain_z = InputEvent::Char(CharInputEvent {
            value: 'z',
            modifier: Modifier::empty(),
        });
        let ctrl_a = InputEvent::Char(CharInputEvent {
            value: 'a',
            modifier: Modifier::CONTROL,
        });
        assert!(plain_z < ctrl_a);
    }

    #[test]
    fn event_ordering_breaks_ties_on_variant_index() {
        let key = InputEvent::Key(KeyInputEvent {
            key: Key::Enter,
            modifier: Modifier::empty(),
        });
        let ch = InputEvent::Char(CharInputEvent {
            value: '\r',
            modifier: Modifier::empty(),
        });
        assert!(key < ch);
    }

    #[test]
    fn key_names_round_trip() {
        for &(name, key) in KEY_NAMES {
            assert_eq!(parse_key(name), Some(key));
            assert_eq!(key.name(), name);
        }
        assert_eq!(parse_key("NoSuchKey"), None);
        assert_eq!(parse_modifier_key("Control"), Some(Modifier::CONTROL));
    }
}
