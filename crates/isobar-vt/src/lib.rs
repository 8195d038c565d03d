#![forbid(unsafe_code)]

//! VT/ANSI escape-sequence processing core.
//!
//! `isobar-vt` is the protocol layer of a terminal emulator: everything
//! between raw pty bytes and a screen-buffer mutator, without owning any
//! screen state or doing any I/O of its own.
//!
//! # Primary responsibilities
//!
//! - **Command**: closed sum type naming every terminal operation.
//! - **Parser**: ECMA-48 lexer state machine, bytes -> classified actions.
//! - **OutputHandler**: classified actions -> decoded `Command` stream.
//! - **InputGenerator**: key/char events -> xterm-exact input byte sequences.
//! - **Generator**: `Command` stream -> ANSI bytes, with SGR batching.
//! - **Selector**: drag selection (linear, word, line, rectangular) over an
//!   injected screen view.
//!
//! # Design principles
//!
//! - **No I/O**: the host feeds bytes in and writes bytes out.
//! - **Malformed input never fails**: protocol errors are logged via
//!   `tracing` and decoding continues (only contract violations panic).
//! - **`#![forbid(unsafe_code)]`**: safety enforced at compile time.

pub mod color;
pub mod command;
pub mod generator;
pub mod handler;
pub mod input;
pub mod parser;
pub mod selector;

pub use color::Color;
pub use command::{Charset, CharsetTable, Command, GraphicsRendition, Mode, MouseProtocol};
pub use generator::{Generator, generate};
pub use handler::OutputHandler;
pub use input::{
    CharInputEvent, InputEvent, InputGenerator, Key, KeyInputEvent, KeyMode, Modifier,
    MouseButton, MousePressEvent, parse_key, parse_modifier_key,
};
pub use parser::{Action, ActionClass, ActionSink, Parser};
pub use selector::{
    CellInfo, Coordinate, Range, SelectionMode, Selector, SelectorState,
};
