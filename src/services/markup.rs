//! Light markup used by result bodies: blank-line separated blocks, lines with
//! leading bullet glyphs, and `**bold**` / `*italic*` spans.

use regex::Regex;
use std::sync::LazyLock;

const GLYPHS: [char; 4] = ['•', '✓', '✗', '□'];

static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[A-Z][^.!?\n]*$").expect("heading pattern"));
static SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|\*([^*]+?)\*").expect("span pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
    List(Vec<ListItem>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub marker: char,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Bold(String),
    Italic(String),
}

pub fn parse_blocks(content: &str) -> Vec<Block> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(classify)
        .collect()
}

fn classify(block: &str) -> Block {
    if block.chars().count() < 100 && HEADING_LINE.is_match(block) {
        return Block::Heading(block.to_string());
    }
    if block.contains(GLYPHS) {
        let items = block
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|line| match line.chars().next() {
                Some(c) if GLYPHS.contains(&c) => ListItem {
                    marker: c,
                    text: line[c.len_utf8()..].trim_start().to_string(),
                },
                _ => ListItem {
                    marker: '•',
                    text: line.to_string(),
                },
            })
            .collect();
        return Block::List(items);
    }
    Block::Paragraph(block.to_string())
}

pub fn parse_spans(text: &str) -> Vec<Span> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in SPAN.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            out.push(Span::Plain(text[last..whole.start()].to_string()));
        }
        if let Some(b) = caps.get(1) {
            out.push(Span::Bold(b.as_str().to_string()));
        } else if let Some(i) = caps.get(2) {
            out.push(Span::Italic(i.as_str().to_string()));
        }
        last = whole.end();
    }
    if last < text.len() {
        out.push(Span::Plain(text[last..].to_string()));
    }
    out
}

fn plain_text(text: &str) -> String {
    parse_spans(text)
        .into_iter()
        .map(|s| match s {
            Span::Plain(t) | Span::Bold(t) | Span::Italic(t) => t,
        })
        .collect()
}

/// Terminal rendering: headings underlined, emphasis markers dropped.
pub fn render_text(blocks: &[Block]) -> String {
    let mut parts = Vec::with_capacity(blocks.len());
    for b in blocks {
        parts.push(match b {
            Block::Heading(h) => {
                let h = plain_text(h);
                let rule = "-".repeat(h.chars().count());
                format!("{}\n{}", h, rule)
            }
            Block::Paragraph(p) => plain_text(p),
            Block::List(items) => items
                .iter()
                .map(|i| format!("  {} {}", i.marker, plain_text(&i.text)))
                .collect::<Vec<_>>()
                .join("\n"),
        });
    }
    parts.join("\n\n")
}

pub fn render_markdown(blocks: &[Block]) -> String {
    let mut parts = Vec::with_capacity(blocks.len());
    for b in blocks {
        parts.push(match b {
            Block::Heading(h) => format!("### {}", h),
            Block::Paragraph(p) => p.clone(),
            Block::List(items) => items
                .iter()
                .map(|i| match i.marker {
                    '•' => format!("- {}", i.text),
                    m => format!("- {} {}", m, i.text),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        });
    }
    parts.join("\n\n")
}
