//! The command model: one closed sum type per decodable terminal operation.
//!
//! A [`Command`] is an immutable value produced exactly once per dispatched
//! sequence by the [`OutputHandler`](crate::handler::OutputHandler) and
//! serialized back to bytes by the [`Generator`](crate::generator::Generator).
//! The screen-buffer mutator that consumes commands lives outside this crate.

use crate::color::Color;

/// SGR text-style codes (colors are carried separately, see [`Color`]).
///
/// Discriminants are the wire-level SGR parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum GraphicsRendition {
    /// Reset style and colors to defaults.
    Reset = 0,
    Bold = 1,
    Faint = 2,
    Italic = 3,
    Underline = 4,
    Blinking = 5,
    /// Swap foreground and background.
    Inverse = 7,
    Hidden = 8,
    CrossedOut = 9,
    DoublyUnderlined = 21,
    /// Neither bold nor faint.
    Normal = 22,
    NoItalic = 23,
    NoUnderline = 24,
    NoBlinking = 25,
    NoInverse = 27,
    NoHidden = 28,
    NoCrossedOut = 29,
}

impl GraphicsRendition {
    /// The SGR parameter value for this rendition.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }
}

/// ANSI and DEC private terminal modes settable via SM/RM and DECSET/DECRST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    // ANSI modes (CSI Pm h / l)
    KeyboardAction,
    Insert,
    SendReceive,
    AutomaticLinefeed,

    // DEC private modes (CSI ? Pm h / l)
    /// DECCKM: cursor keys send SS3-prefixed application sequences.
    UseApplicationCursorKeys,
    DesignateCharsetUsAscii,
    /// DECCOLM: 132-column layout.
    Columns132,
    SmoothScroll,
    ReverseVideo,
    /// DECOM: cursor addressing is relative to, and confined by, the margins.
    CursorRestrictedToMargin,
    /// DECAWM: printing past the right border wraps to the next line.
    AutoWrap,
    PrinterExtend,
    LeftRightMargin,
    ShowToolbar,
    BlinkingCursor,
    VisibleCursor,
    ShowScrollbar,
    UseAlternateScreen,
    BracketedPaste,
}

impl Mode {
    /// The SM/RM parameter string for this mode, with the `?` prefix for
    /// DEC private modes.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Mode::KeyboardAction => "2",
            Mode::Insert => "4",
            Mode::SendReceive => "12",
            Mode::AutomaticLinefeed => "20",

            Mode::UseApplicationCursorKeys => "?1",
            Mode::DesignateCharsetUsAscii => "?2",
            Mode::Columns132 => "?3",
            Mode::SmoothScroll => "?4",
            Mode::ReverseVideo => "?5",
            Mode::CursorRestrictedToMargin => "?6",
            Mode::AutoWrap => "?7",
            Mode::ShowToolbar => "?10",
            Mode::BlinkingCursor => "?12",
            Mode::PrinterExtend => "?19",
            Mode::VisibleCursor => "?25",
            Mode::ShowScrollbar => "?30",
            Mode::UseAlternateScreen => "?47",
            Mode::LeftRightMargin => "?69",
            Mode::BracketedPaste => "?2004",
        }
    }
}

/// The four designable charset slots G0..G3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharsetTable {
    G0,
    G1,
    G2,
    G3,
}

/// Character sets designable into a [`CharsetTable`] slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    /// DEC special character and line drawing set.
    Special,
    Uk,
    UsAscii,
    German,
}

/// Mouse reporting protocols toggled via DECSET/DECRST.
///
/// Discriminants are the DEC private mode numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MouseProtocol {
    X10 = 9,
    Vt200 = 1000,
    Vt200Highlight = 1001,
    ButtonEvent = 1002,
    AnyEvent = 1003,
    FocusEvent = 1004,
    Extended = 1005,
    Sgr = 1006,
    AlternateScroll = 1007,
    Urxvt = 1015,
}

impl MouseProtocol {
    /// The DEC private mode number for this protocol.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }
}

/// A decoded terminal operation.
///
/// Closed sum type: every sequence the decoder understands maps to exactly
/// one variant, and every variant is serializable by the generator. Numeric
/// arguments are `u64` because the wire protocol places no bound on
/// parameter magnitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// BEL.
    Bell,
    /// LF.
    Linefeed,
    /// BS.
    Backspace,
    /// RIS (`ESC c`): reset the terminal to its initial state.
    FullReset,
    /// DECSTR (`CSI ! p`): soft terminal reset.
    SoftTerminalReset,

    /// DSR (`CSI 5 n`).
    DeviceStatusReport,
    /// CPR request (`CSI 6 n`).
    ReportCursorPosition,
    /// DECXCPR request (`CSI ? 6 n`).
    ReportExtendedCursorPosition,
    /// Primary DA (`CSI c`).
    SendDeviceAttributes,
    /// Secondary DA (`CSI > c`).
    SendTerminalId,

    /// ED 0 (`CSI J`).
    ClearToEndOfScreen,
    /// ED 1 (`CSI 1 J`).
    ClearToBeginOfScreen,
    /// ED 2 (`CSI 2 J`).
    ClearScreen,
    /// ED 3 (`CSI 3 J`), an xterm extension.
    ClearScrollbackBuffer,

    /// SU (`CSI Ps S`): scroll the region up by `n` lines.
    ScrollUp(u64),
    /// SD (`CSI Ps T`): scroll the region down by `n` lines.
    ScrollDown(u64),

    /// EL 0 (`CSI K`).
    ClearToEndOfLine,
    /// EL 1 (`CSI 1 K`).
    ClearToBeginOfLine,
    /// EL 2 (`CSI 2 K`).
    ClearLine,

    /// IL (`CSI Ps L`).
    InsertLines(u64),
    /// DL (`CSI Ps M`).
    DeleteLines(u64),
    /// ICH (`CSI Ps @`).
    InsertCharacters(u64),
    /// DCH (`CSI Ps P`).
    DeleteCharacters(u64),
    /// ECH (`CSI Ps X`).
    EraseCharacters(u64),
    /// DECIC (`CSI Ps ' }`).
    InsertColumns(u64),
    /// DECDC (`CSI Ps ' ~`).
    DeleteColumns(u64),

    /// CUU (`CSI Ps A`).
    MoveCursorUp(u64),
    /// CUD (`CSI Ps B`).
    MoveCursorDown(u64),
    /// CUF (`CSI Ps C`).
    MoveCursorForward(u64),
    /// CUB (`CSI Ps D`).
    MoveCursorBackward(u64),
    /// CPL (`CSI Ps F`).
    CursorPreviousLine(u64),
    /// CHA (`CSI Ps G`): move to absolute 1-based column.
    MoveCursorToColumn(u64),
    /// VPA (`CSI Ps d`): move to absolute 1-based line.
    MoveCursorToLine(u64),
    /// CR: move to the left margin of the current line.
    MoveCursorToBeginOfLine,
    /// CUP/HVP (`CSI Ps ; Ps H`): 1-based row and column; 0 means 1.
    MoveCursorTo { row: u64, column: u64 },
    /// HT: advance to the next tab stop.
    MoveCursorToNextTab,
    /// HPA (`` CSI Ps ` ``).
    HorizontalPositionAbsolute(u64),
    /// HPR (`CSI Ps a`).
    HorizontalPositionRelative(u64),

    /// DECSC (`ESC 7`).
    SaveCursor,
    /// DECRC (`ESC 8`).
    RestoreCursor,
    /// IND (`ESC D`): cursor down, scrolling at the bottom margin.
    Index,
    /// RI (`ESC M`): cursor up, scrolling at the top margin.
    ReverseIndex,
    /// DECBI (`ESC 6`).
    BackIndex,
    /// DECFI (`ESC 9`).
    ForwardIndex,

    SetForegroundColor(Color),
    SetBackgroundColor(Color),
    SetGraphicsRendition(GraphicsRendition),

    /// SM/RM or DECSET/DECRST for a recognized [`Mode`].
    SetMode { mode: Mode, enable: bool },
    /// DECSET/DECRST for a mouse reporting mode.
    SendMouseEvents { protocol: MouseProtocol, enable: bool },

    /// DECKPAM (`ESC =`, enable) / DECKPNM (`ESC >`, disable).
    AlternateKeypadMode(bool),
    /// Designate a charset into a G-table slot.
    DesignateCharset { table: CharsetTable, charset: Charset },
    /// SS2 (`ESC N`) / SS3 (`ESC O`): select a table for the next character only.
    SingleShiftSelect(CharsetTable),

    /// DECSTBM (`CSI Pt ; Pb r`): 1-based inclusive margins.
    SetTopBottomMargin { top: u64, bottom: u64 },
    /// DECSLRM (`CSI Pl ; Pr s`).
    SetLeftRightMargin { left: u64, right: u64 },
    /// DECALN (`ESC # 8`).
    ScreenAlignmentPattern,

    /// OSC 0/2: set the window title.
    ChangeWindowTitle(String),
    /// OSC 0/1: set the icon name.
    ChangeIconName(String),

    /// Plain printable text, one codepoint at a time.
    AppendChar(char),
}
