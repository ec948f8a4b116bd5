//! Coloured shell output
//!
//! Results are blue and warnings red, unless colour is off.

use crossterm::style::Stylize;
use std::io::Write;

pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Write a result; the caller supplies newlines
    pub fn result(&mut self, msg: &str) -> std::io::Result<()> {
        if self.color {
            write!(self.out, "{}", msg.blue())?;
        } else {
            write!(self.out, "{}", msg)?;
        }
        self.out.flush()
    }

    /// Write a warning; the caller supplies newlines
    pub fn warning(&mut self, msg: &str) -> std::io::Result<()> {
        if self.color {
            write!(self.out, "{}", msg.red())?;
        } else {
            write!(self.out, "{}", msg)?;
        }
        self.out.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output() {
        let mut console = Console::new(Vec::new(), false);
        console.result("ok\n").unwrap();
        console.warning("careful\n").unwrap();
        assert_eq!(String::from_utf8(console.into_inner()).unwrap(), "ok\ncareful\n");
    }

    #[test]
    fn test_coloured_output_wraps_in_escape_codes() {
        let mut console = Console::new(Vec::new(), true);
        console.warning("careful").unwrap();
        let text = String::from_utf8(console.into_inner()).unwrap();
        assert!(text.contains("careful"));
        assert!(text.starts_with('\u{1b}'));
    }
}
