//! Output/sequence decoder: classified lexer actions -> [`Command`] stream.
//!
//! The [`OutputHandler`] is the interpretation half of the decode pipeline.
//! It receives one classified action per [`invoke_action`] call, accumulates
//! per-sequence state (intermediates, parameters), and dispatches on the
//! final byte to emit commands. Commands accumulate internally and are
//! drained by the caller with [`take_commands`].
//!
//! Protocol errors are never fatal: recognized-but-unimplemented sequences
//! log at `debug`, malformed sequences log at `warn`, and decoding always
//! continues with the next action.
//!
//! [`invoke_action`]: ActionSink::invoke_action
//! [`take_commands`]: OutputHandler::take_commands

use tracing::{debug, warn};

use crate::color::Color;
use crate::command::{Charset, CharsetTable, Command, GraphicsRendition, Mode, MouseProtocol};
use crate::parser::{Action, ActionClass, ActionSink};

/// Upper bound on accumulated OSC payload bytes. Payload past the cap is
/// dropped, so an unterminated OSC string cannot grow the buffer without
/// limit.
const MAX_OSC_LENGTH: usize = 1024;

/// Per-sequence accumulator, reset atomically on `Clear`.
#[derive(Debug, Clone)]
struct SequenceBuffer {
    /// Collected intermediate/prefix bytes; also doubles as the OSC payload
    /// buffer between `OscStart` and `OscEnd`.
    intermediates: String,
    /// Numeric parameters; the last element accumulates decimal digits.
    /// Never empty.
    params: Vec<u64>,
    /// Whether any `Param` action arrived for this sequence.
    params_seen: bool,
    /// Value substituted for absent or zero parameters; set per dispatch
    /// branch before reading.
    default_param: u64,
}

impl SequenceBuffer {
    fn new() -> Self {
        Self {
            intermediates: String::new(),
            params: vec![0],
            params_seen: false,
            default_param: 0,
        }
    }

    fn reset(&mut self) {
        self.intermediates.clear();
        self.params.clear();
        self.params.push(0);
        self.params_seen = false;
        self.default_param = 0;
    }

    fn collect(&mut self, ch: char) {
        self.intermediates.push(ch);
    }
}

/// Decoder for classified escape-sequence actions.
///
/// Drive it from a [`Parser`](crate::parser::Parser) (or any other ECMA-48
/// lexer) and drain decoded commands between feeds:
///
/// ```
/// use isobar_vt::command::Command;
/// use isobar_vt::handler::OutputHandler;
/// use isobar_vt::parser::Parser;
///
/// let mut lexer = Parser::new();
/// let mut handler = OutputHandler::new(24);
/// lexer.feed(&mut handler, b"\x1b[2J");
/// assert_eq!(handler.take_commands(), vec![Command::ClearScreen]);
/// ```
#[derive(Debug)]
pub struct OutputHandler {
    /// Screen height; seeds the DECSTBM bottom-margin default.
    row_count: u64,
    seq: SequenceBuffer,
    current_char: char,
    commands: Vec<Command>,
}

impl ActionSink for OutputHandler {
    fn invoke_action(&mut self, _class: ActionClass, action: Action, ch: char) {
        self.current_char = ch;

        match action {
            Action::Clear => self.seq.reset(),
            Action::Collect => self.seq.collect(ch),
            Action::Print => self.emit(Command::AppendChar(ch)),
            Action::Param => {
                if ch == ';' {
                    self.seq.params.push(0);
                } else if let (Some(d), Some(last)) =
                    (ch.to_digit(10), self.seq.params.last_mut())
                {
                    *last = last.saturating_mul(10).saturating_add(u64::from(d));
                }
                self.seq.params_seen = true;
            }
            Action::CsiDispatch => self.dispatch_csi_family(),
            Action::Execute => self.execute_control_function(),
            Action::EscDispatch => self.dispatch_esc_family(),
            Action::OscStart => {}
            Action::OscPut => {
                if self.seq.intermediates.len() + ch.len_utf8() <= MAX_OSC_LENGTH {
                    self.seq.intermediates.push(ch);
                }
            }
            Action::OscEnd => {
                self.dispatch_osc();
                self.seq.intermediates.clear();
            }
            Action::Hook | Action::Put | Action::Unhook => {
                debug!(
                    action = ?action,
                    ch = ?ch,
                    "unsupported DCS action, payload dropped"
                );
            }
            Action::Ignore | Action::Undefined => {}
        }
    }
}

impl OutputHandler {
    /// Create a decoder for a screen of `row_count` lines.
    #[must_use]
    pub fn new(row_count: u64) -> Self {
        Self {
            row_count,
            seq: SequenceBuffer::new(),
            current_char: '\0',
            commands: Vec::new(),
        }
    }

    /// Drain every command decoded since the previous call.
    #[must_use]
    pub fn take_commands(&mut self) -> Vec<Command> {
        core::mem::take(&mut self.commands)
    }

    /// Decoded commands not yet drained.
    #[must_use]
    pub fn pending_commands(&self) -> &[Command] {
        &self.commands
    }

    fn emit(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// The i-th parameter, substituting the branch default for absent *and*
    /// zero-valued slots (VT convention: zero means "use the default").
    fn param(&self, i: usize) -> u64 {
        match self.seq.params.get(i) {
            Some(&v) if v != 0 => v,
            _ => self.seq.default_param,
        }
    }

    /// The i-th parameter as written, 0 when absent. SGR needs raw zeros.
    fn raw_param(&self, i: usize) -> u64 {
        self.seq.params.get(i).copied().unwrap_or(0)
    }

    /// Number of explicitly received parameters (0 for a bare sequence).
    fn parameter_count(&self) -> usize {
        if self.seq.params_seen {
            self.seq.params.len()
        } else {
            0
        }
    }

    fn set_default_parameter(&mut self, v: u64) {
        self.seq.default_param = v;
    }

    // ── dispatch: CSI ──────────────────────────────────────────────

    fn dispatch_csi_family(&mut self) {
        match self.seq.intermediates.as_str() {
            "" => self.dispatch_csi(),
            "?" => self.dispatch_csi_dec(),
            "!" => self.dispatch_csi_excl(),
            ">" => self.dispatch_csi_gt(),
            "'" => self.dispatch_csi_single_quote(),
            "$" => {
                if self.current_char == 'p' {
                    if self.parameter_count() == 1 {
                        self.request_mode(self.raw_param(0));
                    } else {
                        self.log_invalid_csi("DECRQM takes exactly one parameter");
                    }
                } else {
                    self.log_unsupported_csi();
                }
            }
            "?$" => {
                if self.current_char == 'p' {
                    if self.parameter_count() == 1 {
                        self.request_mode_dec(self.raw_param(0));
                    } else {
                        self.log_invalid_csi("DECRQM takes exactly one parameter");
                    }
                } else {
                    self.log_unsupported_csi();
                }
            }
            _ => self.log_unsupported_csi(),
        }
    }

    fn dispatch_csi(&mut self) {
        match self.current_char {
            'A' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::MoveCursorUp(n));
            }
            'B' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::MoveCursorDown(n));
            }
            'C' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::MoveCursorForward(n));
            }
            'D' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::MoveCursorBackward(n));
            }
            'F' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::CursorPreviousLine(n));
            }
            'G' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::MoveCursorToColumn(n));
            }
            'H' | 'f' => {
                self.set_default_parameter(1);
                let row = self.param(0);
                let column = self.param(1);
                self.emit(Command::MoveCursorTo { row, column });
            }
            'J' => match self.raw_param(0) {
                0 => self.emit(Command::ClearToEndOfScreen),
                1 => self.emit(Command::ClearToBeginOfScreen),
                2 => self.emit(Command::ClearScreen),
                3 => self.emit(Command::ClearScrollbackBuffer),
                _ => self.log_invalid_csi("ED mode out of range"),
            },
            'K' => match self.raw_param(0) {
                0 => self.emit(Command::ClearToEndOfLine),
                1 => self.emit(Command::ClearToBeginOfLine),
                2 => self.emit(Command::ClearLine),
                _ => self.log_invalid_csi("EL mode out of range"),
            },
            'L' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::InsertLines(n));
            }
            'M' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::DeleteLines(n));
            }
            'P' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::DeleteCharacters(n));
            }
            'S' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::ScrollUp(n));
            }
            'T' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::ScrollDown(n));
            }
            'X' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::EraseCharacters(n));
            }
            'c' => {
                if self.raw_param(0) == 0 {
                    self.emit(Command::SendDeviceAttributes);
                } else {
                    self.log_invalid_csi("primary DA takes parameter 0");
                }
            }
            'd' => {
                self.set_default_parameter(1);
                let n = self.param(0);
                self.emit(Command::MoveCursorToLine(n));
            }
            'n' => match self.raw_param(0) {
                5 => self.emit(Command::DeviceStatusReport),
                6 => self.emit(Command::ReportCursorPosition),
                _ => self.log_unsupported_csi(),
            },
            'p' => {
                if self.parameter_count() == 1 {
                    self.request_mode(self.raw_param(0));
                } else {
                    self.log_invalid_csi("DECRQM takes exactly one parameter");
                }
            }
            'r' => {
                self.set_default_parameter(1);
                let top = self.param(0);
                self.set_default_parameter(self.row_count);
                let bottom = self.param(1);
                self.emit(Command::SetTopBottomMargin { top, bottom });
            }
            's' => {
                if self.parameter_count() == 2 {
                    self.set_default_parameter(1);
                    let left = self.param(0);
                    let right = self.param(1);
                    self.emit(Command::SetLeftRightMargin { left, right });
                } else {
                    self.log_invalid_csi("DECSLRM takes exactly two parameters");
                }
            }
            'h' => {
                for i in 0..self.parameter_count().max(1) {
                    self.set_mode(self.raw_param(i), true);
                }
            }
            'l' => {
                for i in 0..self.parameter_count().max(1) {
                    self.set_mode(self.raw_param(i), false);
                }
            }
            'm' => self.dispatch_graphics_rendition(),
            '@' => {
                if self.parameter_count() <= 1 {
                    self.set_default_parameter(1);
                    let n = self.param(0);
                    self.emit(Command::InsertCharacters(n));
                } else {
                    self.log_invalid_csi("ICH takes at most one parameter");
                }
            }
            '`' => {
                if self.parameter_count() <= 1 {
                    self.set_default_parameter(1);
                    let n = self.param(0);
                    self.emit(Command::HorizontalPositionAbsolute(n));
                } else {
                    self.log_invalid_csi("HPA takes at most one parameter");
                }
            }
            'a' => {
                if self.parameter_count() <= 1 {
                    self.set_default_parameter(1);
                    let n = self.param(0);
                    self.emit(Command::HorizontalPositionRelative(n));
                } else {
                    self.log_invalid_csi("HPR takes at most one parameter");
                }
            }
            _ => self.log_unsupported_csi(),
        }
    }

    fn dispatch_csi_dec(&mut self) {
        match self.current_char {
            '6' => self.emit(Command::ReportExtendedCursorPosition),
            'h' => {
                for i in 0..self.parameter_count().max(1) {
                    self.set_mode_dec(self.raw_param(i), true);
                }
            }
            'l' => {
                for i in 0..self.parameter_count().max(1) {
                    self.set_mode_dec(self.raw_param(i), false);
                }
            }
            _ => self.log_unsupported_csi(),
        }
    }

    fn dispatch_csi_excl(&mut self) {
        match self.current_char {
            'p' => {
                if self.parameter_count() == 0 {
                    self.emit(Command::SoftTerminalReset);
                } else {
                    self.log_invalid_csi("DECSTR takes no parameters");
                }
            }
            _ => self.log_unsupported_csi(),
        }
    }

    fn dispatch_csi_gt(&mut self) {
        match self.current_char {
            'c' => {
                if self.raw_param(0) == 0 {
                    self.emit(Command::SendTerminalId);
                } else {
                    self.log_invalid_csi("secondary DA takes parameter 0");
                }
            }
            _ => self.log_unsupported_csi(),
        }
    }

    fn dispatch_csi_single_quote(&mut self) {
        match self.current_char {
            '~' => {
                if self.parameter_count() <= 1 {
                    self.set_default_parameter(1);
                    let n = self.param(0);
                    self.emit(Command::DeleteColumns(n));
                } else {
                    self.log_invalid_csi("DECDC takes at most one parameter");
                }
            }
            '}' => {
                if self.parameter_count() <= 1 {
                    self.set_default_parameter(1);
                    let n = self.param(0);
                    self.emit(Command::InsertColumns(n));
                } else {
                    self.log_invalid_csi("DECIC takes at most one parameter");
                }
            }
            _ => self.log_unsupported_csi(),
        }
    }

    // ── dispatch: C0/C1 ────────────────────────────────────────────

    fn execute_control_function(&mut self) {
        match self.current_char {
            '\u{07}' => self.emit(Command::Bell),
            '\u{08}' => self.emit(Command::Backspace),
            '\u{09}' => self.emit(Command::MoveCursorToNextTab),
            '\u{0a}' => self.emit(Command::Linefeed),
            // VT and FF: xterm performs an index for both.
            '\u{0b}' | '\u{0c}' => self.emit(Command::Index),
            '\u{0d}' => self.emit(Command::MoveCursorToBeginOfLine),
            ch => debug!(code = ch as u32, "unsupported control function"),
        }
    }

    // ── dispatch: ESC ──────────────────────────────────────────────

    fn dispatch_esc_family(&mut self) {
        if self.seq.intermediates.is_empty() {
            self.dispatch_esc();
        } else if self.seq.intermediates == "#" && self.current_char == '8' {
            self.emit(Command::ScreenAlignmentPattern);
        } else if self.seq.intermediates == "(" && self.current_char == 'B' {
            debug!("unsupported: designate character set US-ASCII");
        } else if self.current_char == '0' {
            match charset_table_for_code(&self.seq.intermediates) {
                Some(table) => self.emit(Command::DesignateCharset {
                    table,
                    charset: Charset::Special,
                }),
                None => self.log_invalid_esc("invalid charset table identifier"),
            }
        } else {
            self.log_invalid_esc("");
        }
    }

    fn dispatch_esc(&mut self) {
        match self.current_char {
            '6' => self.emit(Command::BackIndex),
            '7' => self.emit(Command::SaveCursor),
            '8' => self.emit(Command::RestoreCursor),
            '9' => self.emit(Command::ForwardIndex),
            '=' => self.emit(Command::AlternateKeypadMode(true)),
            '>' => self.emit(Command::AlternateKeypadMode(false)),
            'D' => self.emit(Command::Index),
            'M' => self.emit(Command::ReverseIndex),
            // SS2/SS3: single shift select of G2/G3.
            'N' => self.emit(Command::SingleShiftSelect(CharsetTable::G2)),
            'O' => self.emit(Command::SingleShiftSelect(CharsetTable::G3)),
            'A' => self.emit(Command::DesignateCharset {
                table: CharsetTable::G0,
                charset: Charset::Uk,
            }),
            'B' => self.emit(Command::DesignateCharset {
                table: CharsetTable::G0,
                charset: Charset::UsAscii,
            }),
            'K' => self.emit(Command::DesignateCharset {
                table: CharsetTable::G0,
                charset: Charset::German,
            }),
            'c' => self.emit(Command::FullReset),
            ch => debug!(final_byte = ?ch, "unsupported ESC sequence"),
        }
    }

    // ── dispatch: OSC ──────────────────────────────────────────────

    fn dispatch_osc(&mut self) {
        let payload = self.seq.intermediates.clone();
        let Some((id, value)) = payload.split_once(';') else {
            debug!(payload = %payload, "unsupported OSC payload: missing separator");
            return;
        };
        match id.parse::<u64>() {
            Ok(0) => {
                self.emit(Command::ChangeWindowTitle(value.to_owned()));
                self.emit(Command::ChangeIconName(value.to_owned()));
            }
            Ok(1) => self.emit(Command::ChangeIconName(value.to_owned())),
            Ok(2) => self.emit(Command::ChangeWindowTitle(value.to_owned())),
            Ok(id) => debug!(id, "unsupported OSC command"),
            Err(_) => debug!(payload = %payload, "unsupported OSC payload: non-numeric id"),
        }
    }

    // ── modes ──────────────────────────────────────────────────────

    fn set_mode(&mut self, mode: u64, enable: bool) {
        match mode {
            4 => self.emit(Command::SetMode {
                mode: Mode::Insert,
                enable,
            }),
            // 2 (KAM), 12 (SRM), 20 (LNM) are recognized but not implemented.
            _ => debug!(mode, "unsupported ANSI set-mode"),
        }
    }

    fn set_mode_dec(&mut self, mode: u64, enable: bool) {
        let simple = |m: Mode| Command::SetMode { mode: m, enable };
        let mouse = |p: MouseProtocol| Command::SendMouseEvents {
            protocol: p,
            enable,
        };
        match mode {
            1 => self.emit(simple(Mode::UseApplicationCursorKeys)),
            2 => self.emit(simple(Mode::DesignateCharsetUsAscii)),
            3 => self.emit(simple(Mode::Columns132)),
            4 => self.emit(simple(Mode::SmoothScroll)),
            5 => self.emit(simple(Mode::ReverseVideo)),
            6 => self.emit(simple(Mode::CursorRestrictedToMargin)),
            7 => self.emit(simple(Mode::AutoWrap)),
            9 => self.emit(mouse(MouseProtocol::X10)),
            10 => self.emit(simple(Mode::ShowToolbar)),
            12 => self.emit(simple(Mode::BlinkingCursor)),
            19 => self.emit(simple(Mode::PrinterExtend)),
            25 => self.emit(simple(Mode::VisibleCursor)),
            30 => self.emit(simple(Mode::ShowScrollbar)),
            47 => self.emit(simple(Mode::UseAlternateScreen)),
            69 => self.emit(simple(Mode::LeftRightMargin)),
            1000 => self.emit(mouse(MouseProtocol::Vt200)),
            1001 => self.emit(mouse(MouseProtocol::Vt200Highlight)),
            1002 => self.emit(mouse(MouseProtocol::ButtonEvent)),
            1003 => self.emit(mouse(MouseProtocol::AnyEvent)),
            1004 => self.emit(mouse(MouseProtocol::FocusEvent)),
            1005 => self.emit(mouse(MouseProtocol::Extended)),
            1006 => self.emit(mouse(MouseProtocol::Sgr)),
            1007 => self.emit(mouse(MouseProtocol::AlternateScroll)),
            1015 => self.emit(mouse(MouseProtocol::Urxvt)),
            1047 => self.emit(simple(Mode::UseAlternateScreen)),
            1048 => {
                if enable {
                    self.emit(Command::SaveCursor);
                } else {
                    self.emit(Command::RestoreCursor);
                }
            }
            1049 => {
                if enable {
                    self.emit(Command::SaveCursor);
                    self.emit(Command::SetMode {
                        mode: Mode::UseAlternateScreen,
                        enable: true,
                    });
                    self.emit(Command::ClearScreen);
                } else {
                    self.emit(Command::SetMode {
                        mode: Mode::UseAlternateScreen,
                        enable: false,
                    });
                    self.emit(Command::RestoreCursor);
                }
            }
            2004 => self.emit(simple(Mode::BracketedPaste)),
            _ => debug!(mode, "unsupported DEC set-mode"),
        }
    }

    /// DECRQM over ANSI modes. The mode is recognized but a ReportMode
    /// response is deliberately not produced; see DESIGN.md.
    fn request_mode(&mut self, mode: u64) {
        match mode {
            1..=5 | 7 | 10..=20 => self.log_unsupported_csi(),
            _ => self.log_invalid_csi("unknown ANSI mode"),
        }
    }

    /// DECRQM over DEC private modes; logged-only like [`request_mode`].
    ///
    /// [`request_mode`]: Self::request_mode
    fn request_mode_dec(&mut self, mode: u64) {
        match mode {
            1..=8 | 18 | 19 | 25 | 34..=36 | 42 | 57 | 60 | 61 | 64 | 66..=69 | 73 | 81
            | 95..=104 | 106 => self.log_unsupported_csi(),
            _ => self.log_invalid_csi("unknown DEC mode"),
        }
    }

    // ── SGR ────────────────────────────────────────────────────────

    fn dispatch_graphics_rendition(&mut self) {
        let n = self.parameter_count().max(1);
        let mut i = 0;
        while i < n {
            match self.raw_param(i) {
                0 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::Reset)),
                1 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::Bold)),
                2 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::Faint)),
                3 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::Italic)),
                4 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::Underline)),
                5 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::Blinking)),
                7 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::Inverse)),
                8 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::Hidden)),
                9 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::CrossedOut)),
                21 => self.emit(Command::SetGraphicsRendition(
                    GraphicsRendition::DoublyUnderlined,
                )),
                22 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::Normal)),
                23 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::NoItalic)),
                24 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::NoUnderline)),
                25 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::NoBlinking)),
                27 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::NoInverse)),
                28 => self.emit(Command::SetGraphicsRendition(GraphicsRendition::NoHidden)),
                29 => self.emit(Command::SetGraphicsRendition(
                    GraphicsRendition::NoCrossedOut,
                )),
                c @ 30..=37 => {
                    self.emit(Command::SetForegroundColor(Color::Indexed((c - 30) as u8)));
                }
                38 => i = self.parse_extended_color(i, false),
                39 => self.emit(Command::SetForegroundColor(Color::Default)),
                c @ 40..=47 => {
                    self.emit(Command::SetBackgroundColor(Color::Indexed((c - 40) as u8)));
                }
                48 => i = self.parse_extended_color(i, true),
                49 => self.emit(Command::SetBackgroundColor(Color::Default)),
                c @ 90..=97 => {
                    self.emit(Command::SetForegroundColor(Color::Indexed(
                        (c - 90 + 8) as u8,
                    )));
                }
                c @ 100..=107 => {
                    self.emit(Command::SetBackgroundColor(Color::Indexed(
                        (c - 100 + 8) as u8,
                    )));
                }
                _ => self.log_unsupported_csi(),
            }
            i += 1;
        }
    }

    /// Consume the trailing parameters of an SGR 38/48 extended color at
    /// index `i`, returning the index of the last consumed parameter so the
    /// caller's iteration never reprocesses consumed values.
    fn parse_extended_color(&mut self, mut i: usize, background: bool) -> usize {
        let n = self.parameter_count();
        if i + 1 >= n {
            self.log_invalid_csi("extended color without mode");
            return i;
        }
        i += 1;
        match self.raw_param(i) {
            5 => {
                if i + 1 < n {
                    i += 1;
                    let value = self.raw_param(i);
                    if value <= 255 {
                        let color = Color::Indexed(value as u8);
                        self.emit_color(color, background);
                    } else {
                        self.log_invalid_csi("palette index out of range");
                    }
                } else {
                    self.log_invalid_csi("missing palette index");
                }
            }
            2 => {
                if i + 3 < n {
                    let r = self.raw_param(i + 1);
                    let g = self.raw_param(i + 2);
                    let b = self.raw_param(i + 3);
                    i += 3;
                    if r <= 255 && g <= 255 && b <= 255 {
                        let color = Color::Rgb(r as u8, g as u8, b as u8);
                        self.emit_color(color, background);
                    } else {
                        self.log_invalid_csi("RGB color out of range");
                    }
                } else {
                    self.log_invalid_csi("missing RGB components");
                }
            }
            _ => self.log_invalid_csi("invalid extended color mode"),
        }
        i
    }

    fn emit_color(&mut self, color: Color, background: bool) {
        if background {
            self.emit(Command::SetBackgroundColor(color));
        } else {
            self.emit(Command::SetForegroundColor(color));
        }
    }

    // ── diagnostics ────────────────────────────────────────────────

    fn sequence_text(&self) -> String {
        let params = self
            .seq
            .params
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "CSI {} {} {}",
            self.seq.intermediates, params, self.current_char
        )
    }

    fn log_unsupported_csi(&self) {
        debug!(sequence = %self.sequence_text(), "unsupported CSI sequence");
    }

    fn log_invalid_csi(&self, message: &str) {
        warn!(sequence = %self.sequence_text(), message, "invalid CSI sequence");
    }

    fn log_invalid_esc(&self, message: &str) {
        warn!(
            intermediates = %self.seq.intermediates,
            final_byte = ?self.current_char,
            message,
            "invalid ESC sequence"
        );
    }
}

/// Map an ESC-sequence intermediate to the charset slot it designates.
fn charset_table_for_code(intermediate: &str) -> Option<CharsetTable> {
    let mut chars = intermediate.chars();
    let code = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match code {
        '(' => Some(CharsetTable::G0),
        ')' | '-' => Some(CharsetTable::G1),
        '*' | '.' => Some(CharsetTable::G2),
        '+' | '/' => Some(CharsetTable::G3),
        _ => None,
    }
}
