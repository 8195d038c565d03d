//! Color model shared by the command layer, the SGR decoder, and the
//! SGR encoder.
//!
//! The 16 base colors are `Indexed(0..=15)` (8 normal + 8 bright); indexes
//! 16..=255 address the xterm 256-color palette; `Rgb` is 24-bit truecolor.

/// A terminal color as carried by [`SetForegroundColor`] and
/// [`SetBackgroundColor`] commands.
///
/// [`SetForegroundColor`]: crate::command::Command::SetForegroundColor
/// [`SetBackgroundColor`]: crate::command::Command::SetBackgroundColor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's configured default foreground or background.
    #[default]
    Default,
    /// Palette color 0..=255.
    Indexed(u8),
    /// 24-bit RGB ("truecolor").
    Rgb(u8, u8, u8),
}

impl Color {
    pub const BLACK: Color = Color::Indexed(0);
    pub const RED: Color = Color::Indexed(1);
    pub const GREEN: Color = Color::Indexed(2);
    pub const YELLOW: Color = Color::Indexed(3);
    pub const BLUE: Color = Color::Indexed(4);
    pub const MAGENTA: Color = Color::Indexed(5);
    pub const CYAN: Color = Color::Indexed(6);
    pub const WHITE: Color = Color::Indexed(7);

    pub const BRIGHT_BLACK: Color = Color::Indexed(8);
    pub const BRIGHT_RED: Color = Color::Indexed(9);
    pub const BRIGHT_GREEN: Color = Color::Indexed(10);
    pub const BRIGHT_YELLOW: Color = Color::Indexed(11);
    pub const BRIGHT_BLUE: Color = Color::Indexed(12);
    pub const BRIGHT_MAGENTA: Color = Color::Indexed(13);
    pub const BRIGHT_CYAN: Color = Color::Indexed(14);
    pub const BRIGHT_WHITE: Color = Color::Indexed(15);

    /// Append the SGR parameters selecting this color to `out`.
    ///
    /// The 16 base colors use the short `30..=37`/`90..=97` forms (plus 10
    /// for background); everything else uses the `38;5;n` / `38;2;r;g;b`
    /// extended forms.
    pub(crate) fn push_sgr_params(self, background: bool, out: &mut Vec<u16>) {
        let offset: u16 = if background { 10 } else { 0 };
        match self {
            Color::Default => out.push(39 + offset),
            Color::Indexed(i @ 0..=7) => out.push(30 + offset + u16::from(i)),
            Color::Indexed(i @ 8..=15) => out.push(90 + offset + u16::from(i - 8)),
            Color::Indexed(i) => out.extend_from_slice(&[38 + offset, 5, u16::from(i)]),
            Color::Rgb(r, g, b) => out.extend_from_slice(&[
                38 + offset,
                2,
                u16::from(r),
                u16::from(g),
                u16::from(b),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_color_uses_short_form() {
        let mut out = Vec::new();
        Color::RED.push_sgr_params(false, &mut out);
        assert_eq!(out, vec![31]);

        out.clear();
        Color::RED.push_sgr_params(true, &mut out);
        assert_eq!(out, vec![41]);
    }

    #[test]
    fn bright_color_uses_aixterm_form() {
        let mut out = Vec::new();
        Color::BRIGHT_CYAN.push_sgr_params(false, &mut out);
        assert_eq!(out, vec![96]);

        out.clear();
        Color::BRIGHT_CYAN.push_sgr_params(true, &mut out);
        assert_eq!(out, vec![106]);
    }

    #[test]
    fn palette_color_uses_extended_form() {
        let mut out = Vec::new();
        Color::Indexed(123).push_sgr_params(false, &mut out);
        assert_eq!(out, vec![38, 5, 123]);
    }

    #[test]
    fn rgb_color_uses_truecolor_form() {
        let mut out = Vec::new();
        Color::Rgb(1, 2, 3).push_sgr_params(true, &mut out);
        assert_eq!(out, vec![48, 2, 1, 2, 3]);
    }

    #[test]
    fn default_color_resets() {
        let mut out = Vec::new();
        Color::Default.push_sgr_params(false, &mut out);
        Color::Default.push_sgr_params(true, &mut out);
        assert_eq!(out, vec![39, 49]);
    }
}
