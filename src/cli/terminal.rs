//! Coloured terminal output for command results.

use owo_colors::{OwoColorize, colors::css};

/// Whether stdout accepts colour.
fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Error,
    Dim,
}

impl Tone {
    fn paint(self, text: &str) -> String {
        if !supports_color() {
            return text.to_string();
        }
        match self {
            Self::Success => text.fg::<css::Green>().to_string(),
            Self::Warning => text.fg::<css::Orange>().to_string(),
            Self::Error => text.fg::<css::Red>().to_string(),
            Self::Dim => text.dimmed().to_string(),
        }
    }
}

/// Colours a message by how the user should read it.
pub trait Colorize {
    /// A completed action, in green.
    fn success(&self) -> String;
    /// Something the user should look at, in amber.
    fn warning(&self) -> String;
    /// A failed line or check, in red.
    fn error(&self) -> String;
    /// Secondary detail.
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        Tone::Success.paint(self.as_ref())
    }

    fn warning(&self) -> String {
        Tone::Warning.paint(self.as_ref())
    }

    fn error(&self) -> String {
        Tone::Error.paint(self.as_ref())
    }

    fn dim(&self) -> String {
        Tone::Dim.paint(self.as_ref())
    }
}
