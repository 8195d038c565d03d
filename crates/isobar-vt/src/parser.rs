//! ECMA-48 lexer.
//!
//! This is a deterministic state machine that classifies an output byte
//! stream into actions for a downstream [`ActionSink`] (normally the
//! [`OutputHandler`](crate::handler::OutputHandler)). It covers:
//!
//! - printable characters (ASCII + full UTF-8) -> `Action::Print`
//! - C0 controls -> `Action::Execute`
//! - CSI sequences -> `Collect`/`Param` accumulation + `Action::CsiDispatch`
//! - ESC-level sequences -> `Action::EscDispatch`
//! - OSC strings -> `OscStart`/`OscPut`/`OscEnd`
//! - DCS strings -> `Hook`/`Put`/`Unhook` (payloads are passed through)
//!
//! The lexer never interprets a sequence; it only accumulates and
//! classifies. Interpretation is the sink's job, which keeps this loop
//! allocation-free and O(1) per byte.

/// Broad category of a classified action, useful for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClass {
    /// Fired when entering a sequence state (Hook, OscStart).
    Enter,
    /// An ordinary in-state event.
    Event,
    /// Fired when leaving a sequence state (Unhook, OscEnd).
    Leave,
    /// A state-transition side effect (Clear).
    Transition,
}

/// A classified lexer action.
///
/// The accompanying `char` is the byte (or assembled codepoint) the action
/// applies to; for `Clear`, `OscStart`, and `Unhook` it is meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Explicit no-op.
    Undefined,
    /// Byte recognized and deliberately skipped.
    Ignore,
    /// Printable codepoint in ground state.
    Print,
    /// C0/C1 control function.
    Execute,
    /// Reset all per-sequence accumulator state.
    Clear,
    /// Append an intermediate/prefix byte to the current sequence.
    Collect,
    /// Accumulate a numeric parameter digit or start a new parameter (`;`).
    Param,
    /// Final byte of an ESC-level sequence.
    EscDispatch,
    /// Final byte of a CSI sequence.
    CsiDispatch,
    /// Start of an OSC string.
    OscStart,
    /// One OSC payload byte.
    OscPut,
    /// OSC terminator (BEL or ST).
    OscEnd,
    /// Final byte of a DCS introducer.
    Hook,
    /// One DCS payload byte.
    Put,
    /// DCS terminator.
    Unhook,
}

/// Receiver for classified lexer actions, invoked once per action in
/// stream order.
pub trait ActionSink {
    fn invoke_action(&mut self, class: ActionClass, action: Action, ch: char);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    /// Malformed CSI; swallow bytes until the final byte.
    CsiIgnore,
    OscString,
    OscEsc,
    DcsEntry,
    DcsPassthrough,
    DcsEsc,
    /// Accumulating a multi-byte UTF-8 character; counts remaining
    /// continuation bytes.
    Utf8 {
        bytes_remaining: u8,
        /// Deliver the assembled codepoint as `OscPut` instead of `Print`,
        /// and return to `OscString` instead of `Ground`.
        in_osc: bool,
    },
}

/// ECMA-48 lexer state.
#[derive(Debug, Clone)]
pub struct Parser {
    state: State,
    /// Accumulator for multi-byte UTF-8 character assembly.
    utf8_buf: [u8; 4],
    utf8_len: u8,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new lexer in ground state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            utf8_buf: [0; 4],
            utf8_len: 0,
        }
    }

    /// Feed a chunk of bytes, delivering classified actions to `sink`.
    pub fn feed(&mut self, sink: &mut impl ActionSink, bytes: &[u8]) {
        for &b in bytes {
            self.advance(sink, b);
        }
    }

    /// Advance the lexer by one byte.
    pub fn advance(&mut self, sink: &mut impl ActionSink, b: u8) {
        match self.state {
            State::Ground => self.advance_ground(sink, b),
            State::Escape => self.advance_escape(sink, b),
            State::EscapeIntermediate => self.advance_escape_intermediate(sink, b),
            State::CsiEntry => self.advance_csi_entry(sink, b),
            State::CsiParam => self.advance_csi_param(sink, b),
            State::CsiIntermediate => self.advance_csi_intermediate(sink, b),
            State::CsiIgnore => self.advance_csi_ignore(sink, b),
            State::OscString => self.advance_osc(sink, b),
            State::OscEsc => self.advance_osc_esc(sink, b),
            State::DcsEntry => self.advance_dcs_entry(sink, b),
            State::DcsPassthrough => self.advance_dcs_passthrough(sink, b),
            State::DcsEsc => self.advance_dcs_esc(sink, b),
            State::Utf8 {
                bytes_remaining,
                in_osc,
            } => self.advance_utf8(sink, b, bytes_remaining, in_osc),
        }
    }

    fn enter_escape(&mut self, sink: &mut impl ActionSink) {
        self.state = State::Escape;
        sink.invoke_action(ActionClass::Transition, Action::Clear, '\0');
    }

    fn advance_ground(&mut self, sink: &mut impl ActionSink, b: u8) {
        match b {
            0x1b => self.enter_escape(sink),
            0x00..=0x1a | 0x1c..=0x1f => {
                sink.invoke_action(ActionClass::Event, Action::Execute, b as char);
            }
            0x20..=0x7e => sink.invoke_action(ActionClass::Event, Action::Print, b as char),
            0x7f => sink.invoke_action(ActionClass::Event, Action::Ignore, b as char),
            // UTF-8 leading bytes; 0xC0/0xC1 are overlong and 0xF5..=0xFF lie
            // outside valid Unicode, all silently dropped.
            0xc2..=0xdf => self.start_utf8(b, 1, false),
            0xe0..=0xef => self.start_utf8(b, 2, false),
            0xf0..=0xf4 => self.start_utf8(b, 3, false),
            _ => {}
        }
    }

    fn start_utf8(&mut self, b: u8, continuation: u8, in_osc: bool) {
        self.utf8_buf[0] = b;
        self.utf8_len = 1;
        self.state = State::Utf8 {
            bytes_remaining: continuation,
            in_osc,
        };
    }

    fn advance_utf8(&mut self, sink: &mut impl ActionSink, b: u8, bytes_remaining: u8, in_osc: bool) {
        if (0x80..=0xbf).contains(&b) {
            let idx = self.utf8_len as usize;
            if idx < 4 {
                self.utf8_buf[idx] = b;
                self.utf8_len += 1;
            }
            if bytes_remaining == 1 {
                self.state = if in_osc { State::OscString } else { State::Ground };
                let len = self.utf8_len as usize;
                let ch = core::str::from_utf8(&self.utf8_buf[..len])
                    .ok()
                    .and_then(|s| s.chars().next());
                self.utf8_len = 0;
                if let Some(ch) = ch {
                    let action = if in_osc { Action::OscPut } else { Action::Print };
                    sink.invoke_action(ActionClass::Event, action, ch);
                }
            } else {
                self.state = State::Utf8 {
                    bytes_remaining: bytes_remaining - 1,
                    in_osc,
                };
            }
        } else {
            // Invalid continuation byte: drop the partial character and
            // reprocess this byte in the state that started the character.
            self.utf8_len = 0;
            if in_osc {
                self.state = State::OscString;
                self.advance_osc(sink, b);
            } else {
                self.state = State::Ground;
                self.advance_ground(sink, b);
            }
        }
    }

    fn advance_escape(&mut self, sink: &mut impl ActionSink, b: u8) {
        match b {
            b'[' => {
                self.state = State::CsiEntry;
                sink.invoke_action(ActionClass::Transition, Action::Clear, '\0');
            }
            b']' => {
                self.state = State::OscString;
                sink.invoke_action(ActionClass::Transition, Action::Clear, '\0');
                sink.invoke_action(ActionClass::Enter, Action::OscStart, '\0');
            }
            b'P' => {
                self.state = State::DcsEntry;
                sink.invoke_action(ActionClass::Transition, Action::Clear, '\0');
            }
            0x20..=0x2f => {
                self.state = State::EscapeIntermediate;
                sink.invoke_action(ActionClass::Event, Action::Collect, b as char);
            }
            0x1b => self.enter_escape(sink),
            0x30..=0x7e => {
                self.state = State::Ground;
                sink.invoke_action(ActionClass::Event, Action::EscDispatch, b as char);
            }
            _ => {
                self.state = State::Ground;
                sink.invoke_action(ActionClass::Event, Action::Undefined, b as char);
            }
        }
    }

    fn advance_escape_intermediate(&mut self, sink: &mut impl ActionSink, b: u8) {
        match b {
            0x20..=0x2f => sink.invoke_action(ActionClass::Event, Action::Collect, b as char),
            0x30..=0x7e => {
                self.state = State::Ground;
                sink.invoke_action(ActionClass::Event, Action::EscDispatch, b as char);
            }
            0x1b => self.enter_escape(sink),
            _ => sink.invoke_action(ActionClass::Event, Action::Ignore, b as char),
        }
    }

    fn advance_csi_entry(&mut self, sink: &mut impl ActionSink, b: u8) {
        match b {
            b'0'..=b'9' | b';' => {
                self.state = State::CsiParam;
                sink.invoke_action(ActionClass::Event, Action::Param, b as char);
            }
            // Private-marker prefixes `< = > ?`.
            0x3c..=0x3f => sink.invoke_action(ActionClass::Event, Action::Collect, b as char),
            0x20..=0x2f => {
                self.state = State::CsiIntermediate;
                sink.invoke_action(ActionClass::Event, Action::Collect, b as char);
            }
            0x40..=0x7e => {
                self.state = State::Ground;
                sink.invoke_action(ActionClass::Event, Action::CsiDispatch, b as char);
            }
            b':' => self.state = State::CsiIgnore,
            0x1b => self.enter_escape(sink),
            0x00..=0x1a | 0x1c..=0x1f => {
                sink.invoke_action(ActionClass::Event, Action::Execute, b as char);
            }
            _ => sink.invoke_action(ActionClass::Event, Action::Ignore, b as char),
        }
    }

    fn advance_csi_param(&mut self, sink: &mut impl ActionSink, b: u8) {
        match b {
            b'0'..=b'9' | b';' => {
                sink.invoke_action(ActionClass::Event, Action::Param, b as char);
            }
            0x20..=0x2f => {
                self.state = State::CsiIntermediate;
                sink.invoke_action(ActionClass::Event, Action::Collect, b as char);
            }
            0x40..=0x7e => {
                self.state = State::Ground;
                sink.invoke_action(ActionClass::Event, Action::CsiDispatch, b as char);
            }
            // Prefix markers and `:` are invalid after parameters started.
            b':' | 0x3c..=0x3f => self.state = State::CsiIgnore,
            0x1b => self.enter_escape(sink),
            0x00..=0x1a | 0x1c..=0x1f => {
                sink.invoke_action(ActionClass::Event, Action::Execute, b as char);
            }
            _ => sink.invoke_action(ActionClass::Event, Action::Ignore, b as char),
        }
    }

    fn advance_csi_intermediate(&mut self, sink: &mut impl ActionSink, b: u8) {
        match b {
            0x20..=0x2f => sink.invoke_action(ActionClass::Event, Action::Collect, b as char),
            0x40..=0x7e => {
                self.state = State::Ground;
                sink.invoke_action(ActionClass::Event, Action::CsiDispatch, b as char);
            }
            // Parameters after intermediates are malformed.
            b'0'..=b'9' | b';' | b':' | 0x3c..=0x3f => self.state = State::CsiIgnore,
            0x1b => self.enter_escape(sink),
            0x00..=0x1a | 0x1c..=0x1f => {
                sink.invoke_action(ActionClass::Event, Action::Execute, b as char);
            }
            _ => sink.invoke_action(ActionClass::Event, Action::Ignore, b as char),
        }
    }

    fn advance_csi_ignore(&mut self, sink: &mut impl ActionSink, b: u8) {
        match b {
            0x40..=0x7e => self.state = State::Ground,
            0x1b => self.enter_escape(sink),
            0x00..=0x1a | 0x1c..=0x1f => {
                sink.invoke_action(ActionClass::Event, Action::Execute, b as char);
            }
            _ => {}
        }
    }

    fn advance_osc(&mut self, sink: &mut impl ActionSink, b: u8) {
        match b {
            0x07 => {
                self.state = State::Ground;
                sink.invoke_action(ActionClass::Leave, Action::OscEnd, b as char);
            }
            0x1b => self.state = State::OscEsc,
            0x00..=0x06 | 0x08..=0x1a | 0x1c..=0x1f => {
                sink.invoke_action(ActionClass::Event, Action::Ignore, b as char);
            }
            // UTF-8 leading bytes; the assembled codepoint is delivered as
            // a single `OscPut` so the payload stays codepoint-accurate.
            0xc2..=0xdf => self.start_utf8(b, 1, true),
            0xe0..=0xef => self.start_utf8(b, 2, true),
            0xf0..=0xf4 => self.start_utf8(b, 3, true),
            0x80..=0xc1 | 0xf5..=0xff => {
                sink.invoke_action(ActionClass::Event, Action::Ignore, b as char);
            }
            _ => sink.invoke_action(ActionClass::Event, Action::OscPut, b as char),
        }
    }

    fn advance_osc_esc(&mut self, sink: &mut impl ActionSink, b: u8) {
        if b == b'\\' {
            // ST terminator.
            self.state = State::Ground;
            sink.invoke_action(ActionClass::Leave, Action::OscEnd, '\u{1b}');
        } else {
            // False alarm; the ESC was payload. Re-deliver it and continue.
            self.state = State::OscString;
            sink.invoke_action(ActionClass::Event, Action::OscPut, '\u{1b}');
            self.advance_osc(sink, b);
        }
    }

    fn advance_dcs_entry(&mut self, sink: &mut impl ActionSink, b: u8) {
        match b {
            b'0'..=b'9' | b';' => sink.invoke_action(ActionClass::Event, Action::Param, b as char),
            0x20..=0x2f | 0x3c..=0x3f => {
                sink.invoke_action(ActionClass::Event, Action::Collect, b as char);
            }
            0x40..=0x7e => {
                self.state = State::DcsPassthrough;
                sink.invoke_action(ActionClass::Enter, Action::Hook, b as char);
            }
            0x1b => self.enter_escape(sink),
            _ => sink.invoke_action(ActionClass::Event, Action::Ignore, b as char),
        }
    }

    fn advance_dcs_passthrough(&mut self, sink: &mut impl ActionSink, b: u8) {
        match b {
            0x1b => self.state = State::DcsEsc,
            0x07 => {
                self.state = State::Ground;
                sink.invoke_action(ActionClass::Leave, Action::Unhook, '\0');
            }
            _ => sink.invoke_action(ActionClass::Event, Action::Put, b as char),
        }
    }

    fn advance_dcs_esc(&mut self, sink: &mut impl ActionSink, b: u8) {
        if b == b'\\' {
            self.state = State::Ground;
            sink.invoke_action(ActionClass::Leave, Action::Unhook, '\0');
        } else {
            self.state = State::DcsPassthrough;
            sink.invoke_action(ActionClass::Event, Action::Put, '\u{1b}');
            self.advance_dcs_passthrough(sink, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every delivered action for assertions.
    #[derive(Default)]
    struct Tape(Vec<(Action, char)>);

    impl ActionSink for Tape {
        fn invoke_action(&mut self, _class: ActionClass, action: Action, ch: char) {
            self.0.push((action, ch));
        }
    }

    fn lex(bytes: &[u8]) -> Vec<(Action, char)> {
        let mut p = Parser::new();
        let mut tape = Tape::default();
        p.feed(&mut tape, bytes);
        tape.0
    }

    // ── Ground state ───────────────────────────────────────────────

    #[test]
    fn printable_ascii_is_print() {
        assert_eq!(
            lex(b"hi"),
            vec![(Action::Print, 'h'), (Action::Print, 'i')]
        );
    }

    #[test]
    fn c0_controls_execute() {
        assert_eq!(
            lex(b"\x07\n\r"),
            vec![
                (Action::Execute, '\x07'),
                (Action::Execute, '\n'),
                (Action::Execute, '\r'),
            ]
        );
    }

    #[test]
    fn utf8_codepoints_assemble_into_single_print() {
        assert_eq!(lex("é".as_bytes()), vec![(Action::Print, 'é')]);
        assert_eq!(lex("中".as_bytes()), vec![(Action::Print, '中')]);
        assert_eq!(lex("🎉".as_bytes()), vec![(Action::Print, '🎉')]);
    }

    #[test]
    fn utf8_split_across_feeds() {
        let mut p = Parser::new();
        let mut tape = Tape::default();
        p.feed(&mut tape, &[0xc3]);
        assert!(tape.0.is_empty());
        p.feed(&mut tape, &[0xa9]);
        assert_eq!(tape.0, vec![(Action::Print, 'é')]);
    }

    #[test]
    fn invalid_utf8_continuation_reprocesses_in_ground() {
        assert_eq!(lex(&[0xc3, b'a']), vec![(Action::Print, 'a')]);
    }

    #[test]
    fn utf8_interrupted_by_escape_restarts_sequence() {
        // 0x1b aborts the pending character and opens an escape.
        assert_eq!(
            lex(&[0xc3, 0x1b, b'c']),
            vec![(Action::Clear, '\0'), (Action::EscDispatch, 'c')]
        );
    }

    // ── CSI ────────────────────────────────────────────────────────

    #[test]
    fn csi_with_params_collects_and_dispatches() {
        assert_eq!(
            lex(b"\x1b[5;10H"),
            vec![
                (Action::Clear, '\0'),
                (Action::Clear, '\0'),
                (Action::Param, '5'),
                (Action::Param, ';'),
                (Action::Param, '1'),
                (Action::Param, '0'),
                (Action::CsiDispatch, 'H'),
            ]
        );
    }

    #[test]
    fn csi_private_prefix_is_collected() {
        assert_eq!(
            lex(b"\x1b[?25l"),
            vec![
                (Action::Clear, '\0'),
                (Action::Clear, '\0'),
                (Action::Collect, '?'),
                (Action::Param, '2'),
                (Action::Param, '5'),
                (Action::CsiDispatch, 'l'),
            ]
        );
    }

    #[test]
    fn csi_intermediate_after_params_is_collected() {
        assert_eq!(
            lex(b"\x1b[2$p"),
            vec![
                (Action::Clear, '\0'),
                (Action::Clear, '\0'),
                (Action::Param, '2'),
                (Action::Collect, '$'),
                (Action::CsiDispatch, 'p'),
            ]
        );
    }

    #[test]
    fn csi_colon_param_is_swallowed_without_dispatch() {
        assert_eq!(
            lex(b"\x1b[38:2m"),
            vec![
                (Action::Clear, '\0'),
                (Action::Clear, '\0'),
                (Action::Param, '3'),
                (Action::Param, '8'),
            ]
        );
    }

    #[test]
    fn c0_inside_csi_still_executes() {
        assert_eq!(
            lex(b"\x1b[2\x07A"),
            vec![
                (Action::Clear, '\0'),
                (Action::Clear, '\0'),
                (Action::Param, '2'),
                (Action::Execute, '\x07'),
                (Action::CsiDispatch, 'A'),
            ]
        );
    }

    // ── ESC ────────────────────────────────────────────────────────

    #[test]
    fn esc_final_dispatches() {
        assert_eq!(
            lex(b"\x1b7"),
            vec![(Action::Clear, '\0'), (Action::EscDispatch, '7')]
        );
    }

    #[test]
    fn esc_intermediate_collects_then_dispatches() {
        assert_eq!(
            lex(b"\x1b#8"),
            vec![
                (Action::Clear, '\0'),
                (Action::Collect, '#'),
                (Action::EscDispatch, '8'),
            ]
        );
    }

    #[test]
    fn esc_within_escape_restarts() {
        assert_eq!(
            lex(b"\x1b\x1bc"),
            vec![
                (Action::Clear, '\0'),
                (Action::Clear, '\0'),
                (Action::EscDispatch, 'c'),
            ]
        );
    }

    // ── OSC ────────────────────────────────────────────────────────

    #[test]
    fn osc_bel_terminated() {
        assert_eq!(
            lex(b"\x1b]0;ab\x07"),
            vec![
                (Action::Clear, '\0'),
                (Action::OscStart, '\0'),
                (Action::OscPut, '0'),
                (Action::OscPut, ';'),
                (Action::OscPut, 'a'),
                (Action::OscPut, 'b'),
                (Action::OscEnd, '\x07'),
            ]
        );
    }

    #[test]
    fn osc_st_terminated() {
        let actions = lex(b"\x1b]2;x\x1b\\");
        assert_eq!(actions.last(), Some(&(Action::OscEnd, '\u{1b}')));
        assert_eq!(
            actions
                .iter()
                .filter(|(a, _)| *a == Action::OscPut)
                .count(),
            3
        );
    }

    #[test]
    fn osc_utf8_payload_assembles_into_single_put() {
        assert_eq!(
            lex("\x1b]2;é\x07".as_bytes()),
            vec![
                (Action::Clear, '\0'),
                (Action::OscStart, '\0'),
                (Action::OscPut, '2'),
                (Action::OscPut, ';'),
                (Action::OscPut, 'é'),
                (Action::OscEnd, '\x07'),
            ]
        );
        let actions = lex("\x1b]2;🎉\x07".as_bytes());
        assert!(actions.contains(&(Action::OscPut, '🎉')));
    }

    #[test]
    fn osc_utf8_payload_split_across_feeds() {
        let mut p = Parser::new();
        let mut tape = Tape::default();
        p.feed(&mut tape, b"\x1b]2;\xc3");
        p.feed(&mut tape, b"\xa9\x07");
        assert!(tape.0.contains(&(Action::OscPut, 'é')));
        assert_eq!(tape.0.last(), Some(&(Action::OscEnd, '\x07')));
    }

    #[test]
    fn osc_invalid_utf8_continuation_reprocesses_in_osc() {
        // The stray lead byte is dropped; the follow-up byte stays payload.
        let actions = lex(b"\x1b]2;\xc3a\x07");
        assert!(actions.contains(&(Action::OscPut, 'a')));
        assert_eq!(actions.last(), Some(&(Action::OscEnd, '\x07')));
    }

    #[test]
    fn osc_embedded_esc_is_payload() {
        let actions = lex(b"\x1b]0;a\x1bb\x07");
        assert!(actions.contains(&(Action::OscPut, '\u{1b}')));
        assert_eq!(actions.last(), Some(&(Action::OscEnd, '\x07')));
    }

    // ── DCS ────────────────────────────────────────────────────────

    #[test]
    fn dcs_hook_put_unhook() {
        assert_eq!(
            lex(b"\x1bPq#0\x1b\\"),
            vec![
                (Action::Clear, '\0'),
                (Action::Hook, 'q'),
                (Action::Put, '#'),
                (Action::Put, '0'),
                (Action::Unhook, '\0'),
            ]
        );
    }

    // ── Robustness ─────────────────────────────────────────────────

    #[test]
    fn interleaved_text_and_sequences() {
        let actions = lex(b"a\x1b[31mb");
        assert_eq!(
            actions,
            vec![
                (Action::Print, 'a'),
                (Action::Clear, '\0'),
                (Action::Clear, '\0'),
                (Action::Param, '3'),
                (Action::Param, '1'),
                (Action::CsiDispatch, 'm'),
                (Action::Print, 'b'),
            ]
        );
    }

    #[test]
    fn truncated_sequence_resumes_on_next_feed() {
        let mut p = Parser::new();
        let mut tape = Tape::default();
        p.feed(&mut tape, b"\x1b[3");
        p.feed(&mut tape, b"1m");
        assert_eq!(tape.0.last(), Some(&(Action::CsiDispatch, 'm')));
    }
}
