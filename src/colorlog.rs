//! Colorized terminal output.
//!
//! Text between `<` and `>` is highlighted in the chosen color; everything
//! else prints plain. An unmatched `<` highlights to the end of the line.

use std::io::Write;

use clap::ValueEnum;
use colored::{Color as Fg, ColoredString, Colorize};

/// Highlight colors. `B`-prefixed variants are bold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Color {
    /// No highlight.
    #[default]
    #[value(name = "white")]
    White,
    /// Dark gray.
    #[value(name = "gray")]
    Gray,
    /// Red.
    #[value(name = "red")]
    Red,
    /// Bold red.
    #[value(name = "b_red")]
    BRed,
    /// Green.
    #[value(name = "green")]
    Green,
    /// Bold green.
    #[value(name = "b_green")]
    BGreen,
    /// Yellow.
    #[value(name = "yellow")]
    Yellow,
    /// Bold yellow.
    #[value(name = "b_yellow")]
    BYellow,
    /// Blue.
    #[value(name = "blue")]
    Blue,
    /// Bold blue.
    #[value(name = "b_blue")]
    BBlue,
    /// Purple.
    #[value(name = "purple")]
    Purple,
    /// Bold purple.
    #[value(name = "b_purple")]
    BPurple,
    /// Turquoise.
    #[value(name = "turquoise")]
    Turquoise,
    /// Bold turquoise.
    #[value(name = "b_turquoise")]
    BTurquoise,
}

impl Color {
    fn paint(self, text: &str) -> ColoredString {
        let (fg, bold) = match self {
            Self::White => return text.normal(),
            Self::Gray => (Fg::Black, false),
            Self::Red => (Fg::Red, false),
            Self::BRed => (Fg::Red, true),
            Self::Green => (Fg::Green, false),
            Self::BGreen => (Fg::Green, true),
            Self::Yellow => (Fg::Yellow, false),
            Self::BYellow => (Fg::Yellow, true),
            Self::Blue => (Fg::Blue, false),
            Self::BBlue => (Fg::Blue, true),
            Self::Purple => (Fg::Magenta, false),
            Self::BPurple => (Fg::Magenta, true),
            Self::Turquoise => (Fg::Cyan, false),
            Self::BTurquoise => (Fg::Cyan, true),
        };
        let painted = text.color(fg);
        if bold {
            painted.bold()
        } else {
            painted
        }
    }
}

/// Splits marked-up text into `(segment, highlighted)` pairs.
fn segments(text: &str) -> Vec<(String, bool)> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut highlighted = false;

    for ch in text.chars() {
        match ch {
            '<' | '>' => {
                if !current.is_empty() {
                    out.push((std::mem::take(&mut current), highlighted));
                }
                highlighted = ch == '<';
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        out.push((current, highlighted));
    }
    out
}

/// Renders marked-up text with the highlighted parts painted in `color`.
#[must_use]
pub fn colorize(text: &str, color: Color) -> String {
    segments(text)
        .into_iter()
        .map(|(segment, highlighted)| {
            if highlighted {
                color.paint(&segment).to_string()
            } else {
                segment
            }
        })
        .collect()
}

/// Prints marked-up text to stdout followed by a newline.
pub fn print_colorlog(text: &str, color: Color) {
    println!("{}", colorize(text, color));
}

/// Prints marked-up text to stderr followed by a newline.
///
/// Wrappers use this for failure diagnostics.
pub fn eprint_colorlog(text: &str, color: Color) {
    eprintln!("{}", colorize(text, color));
}

/// Prints text to stdout without a trailing newline and flushes.
pub fn print_inline(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "{text}");
    let _ = stdout.flush();
}
