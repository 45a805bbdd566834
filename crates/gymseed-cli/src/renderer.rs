//! Terminal rendering module for rich markdown output
//!
//! Reports are markdown. With color enabled, headers are printed in blue
//! with their hash symbols kept and everything between headers (the count
//! table, warning lists) goes through termimad.

use std::io::{self, Write};

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);

        Self { rich_enabled, skin }
    }

    /// Render markdown text to terminal
    pub fn render(&self, markdown: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_to(&mut out, markdown)?;
        out.flush()?;
        Ok(())
    }

    fn render_to<W: Write>(&self, out: &mut W, markdown: &str) -> io::Result<()> {
        if !self.rich_enabled {
            return out.write_all(markdown.as_bytes());
        }

        for block in split_blocks(markdown) {
            match block {
                Block::Header(line) => writeln!(out, "\x1b[34m{line}\x1b[0m")?,
                Block::Body(text) => write!(out, "{}", self.skin.term_text(&text))?,
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[derive(Debug, PartialEq)]
enum Block<'a> {
    Header(&'a str),
    Body(String),
}

/// Splits markdown into header lines and the runs of lines between them.
fn split_blocks(markdown: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut body = String::new();

    for line in markdown.lines() {
        if line.starts_with('#') {
            if !body.trim().is_empty() {
                blocks.push(Block::Body(std::mem::take(&mut body)));
            }
            body.clear();
            blocks.push(Block::Header(line));
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }
    if !body.trim().is_empty() {
        blocks.push(Block::Body(body));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }

    #[test]
    fn test_plain_output_is_unchanged_markdown() {
        let markdown = "# Built gym.db\n\n| Table | Inserted | Skipped |\n";
        let mut out = Vec::new();
        TerminalRenderer::new(false)
            .render_to(&mut out, markdown)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), markdown);
    }

    #[test]
    fn test_rich_output_colors_headers() {
        let mut out = Vec::new();
        TerminalRenderer::new(true)
            .render_to(&mut out, "# Built gym.db\n\n- one warning\n")
            .unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("\x1b[34m# Built gym.db\x1b[0m\n"));
        assert!(output.contains("one warning"));
    }

    #[test]
    fn test_split_blocks() {
        let markdown = "# Built gym.db\n\n| Table | Inserted |\n|:-|-:|\n| Members | 6 |\n\n## Warnings\n\n- one\n";
        let blocks = split_blocks(markdown);

        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0], Block::Header("# Built gym.db"));
        assert!(matches!(&blocks[1], Block::Body(text) if text.contains("| Members | 6 |")));
        assert_eq!(blocks[2], Block::Header("## Warnings"));
        assert_eq!(blocks[3], Block::Body("\n- one\n".to_string()));
    }
}
