use std::sync::LazyLock;

use regex::Regex;

use crate::common::TrustedHtml;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<(/?)([a-zA-Z][a-zA-Z0-9]*)[^>]*>").expect("valid tag pattern")
});
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// A line of laid-out document content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(u8, String),
    Paragraph(String),
    ListItem(String),
    TableRow(Vec<String>),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pending {
    Paragraph,
    Heading(u8),
    ListItem,
}

struct Builder {
    blocks: Vec<Block>,
    text: String,
    pending: Pending,
    row: Option<Vec<String>>,
}

impl Builder {
    fn flush(&mut self) {
        let text = collapse(&self.text);
        self.text.clear();
        if text.is_empty() {
            self.pending = Pending::Paragraph;
            return;
        }

        let block = match self.pending {
            Pending::Paragraph => Block::Paragraph(text),
            Pending::Heading(level) => Block::Heading(level, text),
            Pending::ListItem => Block::ListItem(text),
        };
        self.blocks.push(block);
        self.pending = Pending::Paragraph;
    }

    fn end_cell(&mut self) {
        let text = collapse(&self.text);
        self.text.clear();
        if let Some(row) = self.row.as_mut() {
            row.push(text);
        }
    }

    fn end_row(&mut self) {
        let Some(mut row) = self.row.take() else {
            return;
        };
        let trailing = collapse(&self.text);
        self.text.clear();
        if !trailing.is_empty() {
            row.push(trailing);
        }
        if row.iter().any(|cell| !cell.is_empty()) {
            self.blocks.push(Block::TableRow(row));
        }
    }
}

/// Splits backend markup into blocks for display. The markup itself is
/// never altered; tags only decide where blocks start and end.
pub fn layout(html: &TrustedHtml) -> Vec<Block> {
    let source = html.as_str();
    let mut builder = Builder {
        blocks: Vec::new(),
        text: String::new(),
        pending: Pending::Paragraph,
        row: None,
    };
    let mut skip_until: Option<String> = None;
    let mut cursor = 0;

    for captures in TAG.captures_iter(source) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if skip_until.is_none() {
            builder.text.push_str(&decode_entities(&source[cursor..whole.start()]));
        }
        cursor = whole.end();

        let (Some(slash), Some(name)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        let closing = !slash.as_str().is_empty();
        let name = name.as_str().to_ascii_lowercase();

        if let Some(skipped) = &skip_until {
            if closing && *skipped == name {
                skip_until = None;
            }
            continue;
        }

        match (name.as_str(), closing) {
            ("script" | "style" | "head", false) => skip_until = Some(name.clone()),
            ("h1" | "h2" | "h3" | "h4" | "h5" | "h6", false) => {
                builder.flush();
                builder.pending = Pending::Heading(name.as_bytes()[1] - b'0');
            }
            ("li", false) => {
                builder.flush();
                builder.pending = Pending::ListItem;
            }
            ("tr", false) => {
                builder.flush();
                builder.row = Some(Vec::new());
            }
            ("td" | "th", true) => builder.end_cell(),
            ("tr", true) | ("table", true) => builder.end_row(),
            ("br", _) => {
                if builder.row.is_none() {
                    builder.flush();
                } else {
                    builder.text.push(' ');
                }
            }
            ("p" | "div" | "section" | "article" | "ul" | "ol" | "table" | "blockquote", _)
            | ("h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "li", true) => {
                if builder.row.is_none() {
                    builder.flush();
                }
            }
            _ => {}
        }
    }

    if skip_until.is_none() {
        builder.text.push_str(&decode_entities(&source[cursor..]));
    }
    builder.end_row();
    builder.flush();
    builder.blocks
}

fn collapse(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
