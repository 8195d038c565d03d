//! Command generator: [`Command`] stream -> ANSI bytes.
//!
//! The [`Generator`] is the inverse of the decode pipeline: it serializes
//! commands to the byte sequences a terminal would accept. SGR attributes
//! batch into a single `CSI a;b;..;z m` sequence; the batch flushes before
//! any non-SGR byte is written and when the generator is finished or
//! dropped, so output ordering always matches command ordering.

use std::io;

use tracing::debug;

use crate::color::Color;
use crate::command::{Charset, CharsetTable, Command};

/// Serializer from commands to wire bytes.
///
/// ```
/// use isobar_vt::command::Command;
/// use isobar_vt::generator;
///
/// let bytes = generator::generate(&[
///     Command::ClearScreen,
///     Command::MoveCursorTo { row: 1, column: 1 },
/// ]);
/// assert_eq!(bytes, b"\x1b[2J\x1b[1;1H");
/// ```
#[derive(Debug)]
pub struct Generator<W: io::Write> {
    writer: W,
    /// Pending SGR parameters, not yet written.
    sgr: Vec<u16>,
    current_foreground: Color,
    current_background: Color,
}

impl<W: io::Write> Generator<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            sgr: Vec::new(),
            current_foreground: Color::Default,
            current_background: Color::Default,
        }
    }

    /// Serialize a slice of commands in order.
    pub fn write_all(&mut self, commands: &[Command]) -> io::Result<()> {
        for command in commands {
            self.write_command(command)?;
        }
        Ok(())
    }

    /// Serialize one command.
    pub fn write_command(&mut self, command: &Command) -> io::Result<()> {
        use Command::*;
        match command {
            Bell => self.write(b"\x07"),
            Linefeed => self.write(b"\n"),
            Backspace => self.write(b"\x08"),
            FullReset => self.write(b"\x1bc"),
            SoftTerminalReset => self.write(b"\x1b[!p"),

            DeviceStatusReport => self.write(b"\x1b[5n"),
            ReportCursorPosition => self.write(b"\x1b[6n"),
            ReportExtendedCursorPosition => self.write(b"\x1b[?6n"),
            SendDeviceAttributes => self.write(b"\x1b[c"),
            SendTerminalId => self.write(b"\x1b[>c"),

            ClearToEndOfScreen => self.write(b"\x1b[J"),
            ClearToBeginOfScreen => self.write(b"\x1b[1J"),
            ClearScreen => self.write(b"\x1b[2J"),
            ClearScrollbackBuffer => self.write(b"\x1b[3J"),

            ScrollUp(n) => self.write_fmt(format_args!("\x1b[{n}S")),
            ScrollDown(n) => self.write_fmt(format_args!("\x1b[{n}T")),

            ClearToEndOfLine => self.write(b"\x1b[K"),
            ClearToBeginOfLine => self.write(b"\x1b[1K"),
            ClearLine => self.write(b"\x1b[2K"),

            InsertLines(n) => self.write_fmt(format_args!("\x1b[{n}L")),
            DeleteLines(n) => self.write_fmt(format_args!("\x1b[{n}M")),
            InsertCharacters(n) => self.write_fmt(format_args!("\x1b[{n}@")),
            DeleteCharacters(n) => self.write_fmt(format_args!("\x1b[{n}P")),
            EraseCharacters(n) => self.write_fmt(format_args!("\x1b[{n}X")),
            InsertColumns(n) => self.write_fmt(format_args!("\x1b[{n}'}}")),
            DeleteColumns(n) => self.write_fmt(format_args!("\x1b[{n}'~")),

            MoveCursorUp(n) => self.write_fmt(format_args!("\x1b[{n}A")),
            MoveCursorDown(n) => self.write_fmt(format_args!("\x1b[{n}B")),
            MoveCursorForward(n) => self.write_fmt(format_args!("\x1b[{n}C")),
            MoveCursorBackward(n) => self.write_fmt(format_args!("\x1b[{n}D")),
            CursorPreviousLine(n) => self.write_fmt(format_args!("\x1b[{n}F")),
            MoveCursorToColumn(n) => self.write_fmt(format_args!("\x1b[{n}G")),
            MoveCursorToLine(n) => self.write_fmt(format_args!("\x1b[{n}d")),
            MoveCursorToBeginOfLine => self.write(b"\r"),
            MoveCursorTo { row, column } => {
                self.write_fmt(format_args!("\x1b[{row};{column}H"))
            }
            MoveCursorToNextTab => self.write(b"\t"),
            HorizontalPositionAbsolute(n) => self.write_fmt(format_args!("\x1b[{n}`")),
            HorizontalPositionRelative(n) => self.write_fmt(format_args!("\x1b[{n}a")),

            SaveCursor => self.write(b"\x1b7"),
            RestoreCursor => self.write(b"\x1b8"),
            Index => self.write(b"\x1bD"),
            ReverseIndex => self.write(b"\x1bM"),
            BackIndex => self.write(b"\x1b6"),
            ForwardIndex => self.write(b"\x1b9"),

            SetForegroundColor(color) => {
                self.current_foreground = *color;
                color.push_sgr_params(false, &mut self.sgr);
                Ok(())
            }
            SetBackgroundColor(color) => {
                self.current_background = *color;
                color.push_sgr_params(true, &mut self.sgr);
                Ok(())
            }
            SetGraphicsRendition(rendition) => {
                self.sgr_add(rendition.code());
                Ok(())
            }

            SetMode { mode, enable } => {
                let flag = if *enable { 'h' } else { 'l' };
                self.write_fmt(format_args!("\x1b[{}{flag}", mode.code()))
            }
            SendMouseEvents { protocol, enable } => {
                let flag = if *enable { 'h' } else { 'l' };
                self.write_fmt(format_args!("\x1b[?{}{flag}", protocol.code()))
            }

            AlternateKeypadMode(enable) => {
                if *enable {
                    self.write(b"\x1b=")
                } else {
                    self.write(b"\x1b>")
                }
            }
            DesignateCharset { table, charset } => self.write_designate(*table, *charset),
            SingleShiftSelect(table) => match table {
                CharsetTable::G2 => self.write(b"\x1bN"),
                CharsetTable::G3 => self.write(b"\x1bO"),
                CharsetTable::G0 | CharsetTable::G1 => {
                    debug!(table = ?table, "single shift has no encoding for this table");
                    Ok(())
                }
            },

            SetTopBottomMargin { top, bottom } => {
                self.write_fmt(format_args!("\x1b[{top};{bottom}r"))
            }
            SetLeftRightMargin { left, right } => {
                self.write_fmt(format_args!("\x1b[{left};{right}s"))
            }
            ScreenAlignmentPattern => self.write(b"\x1b#8"),

            ChangeWindowTitle(title) => {
                self.write_fmt(format_args!("\x1b]2;{title}\x07"))
            }
            ChangeIconName(name) => self.write_fmt(format_args!("\x1b]1;{name}\x07")),

            AppendChar(ch) => {
                let mut buf = [0u8; 4];
                self.write(ch.encode_utf8(&mut buf).as_bytes())
            }
        }
    }

    /// Foreground color as of the last serialized color command.
    #[must_use]
    pub fn current_foreground(&self) -> Color {
        self.current_foreground
    }

    /// Background color as of the last serialized color command.
    #[must_use]
    pub fn current_background(&self) -> Color {
        self.current_background
    }

    /// Write any buffered SGR parameters as one `CSI ... m` sequence.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.sgr.is_empty() {
            return Ok(());
        }
        let params = std::mem::take(&mut self.sgr);
        let joined = params
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(";");
        write!(self.writer, "\x1b[{joined}m")
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.flush()?;
        self.writer.write_all(bytes)
    }

    fn write_fmt(&mut self, args: std::fmt::Arguments<'_>) -> io::Result<()> {
        self.flush()?;
        self.writer.write_fmt(args)
    }

    fn sgr_add(&mut self, param: u16) {
        if param == 0 {
            // SGR 0 resets everything, including anything already buffered.
            self.sgr.clear();
            self.current_foreground = Color::Default;
            self.current_background = Color::Default;
        }
        self.sgr.push(param);
    }

    fn write_designate(&mut self, table: CharsetTable, charset: Charset) -> io::Result<()> {
        let intermediate = match table {
            CharsetTable::G0 => b'(',
            CharsetTable::G1 => b')',
            CharsetTable::G2 => b'*',
            CharsetTable::G3 => b'+',
        };
        match (table, charset) {
            (_, Charset::Special) => self.write(&[0x1b, intermediate, b'0']),
            // The national sets have bare ESC-final designations for G0.
            (CharsetTable::G0, Charset::Uk) => self.write(b"\x1bA"),
            (CharsetTable::G0, Charset::UsAscii) => self.write(b"\x1bB"),
            (CharsetTable::G0, Charset::German) => self.write(b"\x1bK"),
            (_, Charset::Uk) => self.write(&[0x1b, intermediate, b'A']),
            (_, Charset::UsAscii) => self.write(&[0x1b, intermediate, b'B']),
            (_, Charset::German) => self.write(&[0x1b, intermediate, b'K']),
        }
    }
}

impl<W: io::Write> Drop for Generator<W> {
    fn drop(&mut self) {
        // Writer failures cannot surface from a destructor.
        let _ = self.flush();
    }
}

/// Serialize a command slice to a byte vector.
#[must_use]
pub fn generate(commands: &[Command]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut generator = Generator::new(&mut out);
        // Writes into a Vec<u8> cannot fail.
        let _ = generator.write_all(commands);
        let _ = generator.flush();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{GraphicsRendition, Mode, MouseProtocol};
    use pretty_assertions::assert_eq;

    // ── SGR batching ───────────────────────────────────────────────

    #[test]
    fn contiguous_sgr_commands_batch_into_one_sequence() {
        let bytes = generate(&[
            Command::SetGraphicsRendition(GraphicsRendition::Bold),
            Command::SetGraphicsRendition(GraphicsRendition::Underline),
            Command::SetForegroundColor(Color::RED),
            Command::AppendChar('x'),
        ]);
        assert_eq!(bytes, b"\x1b[1;4;31mx");
    }

    #[test]
    fn non_sgr_command_splits_the_batch() {
        let bytes = generate(&[
            Command::SetGraphicsRendition(GraphicsRendition::Bold),
            Command::MoveCursorUp(1),
            Command::SetGraphicsRendition(GraphicsRendition::Underline),
        ]);
        assert_eq!(bytes, b"\x1b[1m\x1b[1A\x1b[4m");
    }

    #[test]
    fn trailing_sgr_flushes_at_end() {
        let bytes = generate(&[Command::SetForegroundColor(Color::Default)]);
        assert_eq!(bytes, b"\x1b[39m");
    }

    #[test]
    fn sgr_reset_clears_buffered_attributes() {
        let bytes = generate(&[
            Command::SetGraphicsRendition(GraphicsRendition::Bold),
            Command::SetGraphicsRendition(GraphicsRendition::Reset),
            Command::AppendChar('x'),
        ]);
        assert_eq!(bytes, b"\x1b[0mx");
    }

    #[test]
    fn extended_colors_serialize_with_subparameters() {
        assert_eq!(
            generate(&[Command::SetForegroundColor(Color::Indexed(123))]),
            b"\x1b[38;5;123m"
        );
        assert_eq!(
            generate(&[Command::SetBackgroundColor(Color::Rgb(1, 2, 3))]),
            b"\x1b[48;2;1;2;3m"
        );
    }

    // ── command forms ──────────────────────────────────────────────

    #[test]
    fn cursor_movement_forms() {
        assert_eq!(generate(&[Command::MoveCursorUp(3)]), b"\x1b[3A");
        assert_eq!(
            generate(&[Command::MoveCursorTo { row: 4, column: 9 }]),
            b"\x1b[4;9H"
        );
        assert_eq!(
            generate(&[Command::HorizontalPositionAbsolute(7)]),
            b"\x1b[7`"
        );
    }

    #[test]
    fn mode_forms_carry_private_prefix() {
        assert_eq!(
            generate(&[Command::SetMode {
                mode: Mode::VisibleCursor,
                enable: false
            }]),
            b"\x1b[?25l"
        );
        assert_eq!(
            generate(&[Command::SetMode {
                mode: Mode::Insert,
                enable: true
            }]),
            b"\x1b[4h"
        );
        assert_eq!(
            generate(&[Command::SendMouseEvents {
                protocol: MouseProtocol::Sgr,
                enable: true
            }]),
            b"\x1b[?1006h"
        );
    }

    #[test]
    fn margin_and_column_forms() {
        assert_eq!(
            generate(&[Command::SetTopBottomMargin { top: 2, bottom: 20 }]),
            b"\x1b[2;20r"
        );
        assert_eq!(generate(&[Command::InsertColumns(2)]), b"\x1b[2'}");
        assert_eq!(generate(&[Command::DeleteColumns(1)]), b"\x1b[1'~");
    }

    #[test]
    fn osc_title_and_icon() {
        assert_eq!(
            generate(&[Command::ChangeWindowTitle("hi".into())]),
            b"\x1b]2;hi\x07"
        );
        assert_eq!(
            generate(&[Command::ChangeIconName("ic".into())]),
            b"\x1b]1;ic\x07"
        );
    }

    #[test]
    fn charset_designations() {
        assert_eq!(
            generate(&[Command::DesignateCharset {
                table: CharsetTable::G1,
                charset: Charset::Special
            }]),
            b"\x1b)0"
        );
        assert_eq!(
            generate(&[Command::DesignateCharset {
                table: CharsetTable::G0,
                charset: Charset::Uk
            }]),
            b"\x1bA"
        );
    }

    #[test]
    fn text_flushes_pending_sgr_first() {
        let bytes = generate(&[
            Command::SetGraphicsRendition(GraphicsRendition::Inverse),
            Command::AppendChar('é'),
        ]);
        assert_eq!(bytes, "\x1b[7mé".as_bytes());
    }

    #[test]
    fn color_state_tracks_last_explicit_request() {
        let mut generator = Generator::new(Vec::new());
        generator
            .write_command(&Command::SetForegroundColor(Color::Rgb(9, 9, 9)))
            .unwrap();
        assert_eq!(generator.current_foreground(), Color::Rgb(9, 9, 9));
        assert_eq!(generator.current_background(), Color::Default);
        // Tracking never suppresses a repeated explicit request.
        generator
            .write_command(&Command::SetForegroundColor(Color::Rgb(9, 9, 9)))
            .unwrap();
        generator.flush().unwrap();
        assert_eq!(
            generator.writer,
            b"\x1b[38;2;9;9;9;38;2;9;9;9m".to_vec()
        );
    }

    #[test]
    fn drop_flushes_pending_sgr() {
        let mut out = Vec::new();
        {
            let mut generator = Generator::new(&mut out);
            generator
                .write_command(&Command::SetGraphicsRendition(GraphicsRendition::Bold))
                .unwrap();
        }
        assert_eq!(out, b"\x1b[1m");
    }
}
