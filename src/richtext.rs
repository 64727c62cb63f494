//! Models CMS rich text as a small tree of [`Block`]s and [`Inline`]s. The CMS
//! delivers each block as a string plus a flat list of formatting spans
//! (character ranges); on deserialization the spans are nested into a tree so
//! that the two projections, [`as_text`] for word counting and [`as_html`] for
//! display, are simple recursive walks.

use crate::url::LinkResolver;
use pulldown_cmark::escape::{escape_href, escape_html};
use serde::Deserialize;
use std::cmp::Ordering;

/// The destination of a hyperlink span.
#[derive(Clone, Debug, PartialEq)]
pub enum LinkTarget {
    /// An absolute URL (web and media links).
    Web(String),

    /// Another CMS document, identified by its uid.
    Document(String),
}

/// A run of inline content.
#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Link {
        target: LinkTarget,
        children: Vec<Inline>,
    },

    /// A custom label (rendered as a `span` with the label as its class).
    Label {
        name: String,
        children: Vec<Inline>,
    },
}

/// A block of rich text.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    Preformatted(String),
    ListItem { ordered: bool, content: Vec<Inline> },
    Image { url: String, alt: Option<String> },
    Embed { html: String },
}

impl Block {
    /// A paragraph of unformatted text.
    pub fn paragraph(text: &str) -> Block {
        Block::Paragraph(vec![Inline::Text(text.to_owned())])
    }

    /// Projects the block to plain text. Images and embeds have no text.
    pub fn as_text(&self) -> String {
        let mut out = String::new();
        match self {
            Block::Heading { content, .. }
            | Block::Paragraph(content)
            | Block::ListItem { content, .. } => push_text(&mut out, content),
            Block::Preformatted(text) => out.push_str(text),
            Block::Image { .. } | Block::Embed { .. } => {}
        }
        out
    }

    fn push_html(
        &self,
        out: &mut String,
        links: &LinkResolver,
    ) -> Result<(), url::ParseError> {
        match self {
            Block::Heading { level, content } => {
                out.push_str(&format!("<h{}>", level));
                push_inline_html(out, content, links)?;
                out.push_str(&format!("</h{}>", level));
            }
            Block::Paragraph(content) => {
                out.push_str("<p>");
                push_inline_html(out, content, links)?;
                out.push_str("</p>");
            }
            Block::Preformatted(text) => {
                out.push_str("<pre>");
                push_escaped(out, text);
                out.push_str("</pre>");
            }
            Block::ListItem { content, .. } => {
                out.push_str("<li>");
                push_inline_html(out, content, links)?;
                out.push_str("</li>");
            }
            Block::Image { url, alt } => {
                out.push_str(r#"<p class="block-img"><img src=""#);
                push_escaped_href(out, url);
                out.push_str(r#"" alt=""#);
                push_escaped(out, alt.as_deref().unwrap_or_default());
                out.push_str(r#""></p>"#);
            }
            Block::Embed { html } => {
                out.push_str("<div data-oembed>");
                out.push_str(html);
                out.push_str("</div>");
            }
        }
        Ok(())
    }
}

/// Projects a sequence of blocks to plain text, separating blocks with a
/// single space.
pub fn as_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::as_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Projects a sequence of blocks to HTML. Consecutive list items are grouped
/// into a single `<ul>` or `<ol>`.
pub fn as_html(
    blocks: &[Block],
    links: &LinkResolver,
) -> Result<String, url::ParseError> {
    fn list_tag(ordered: bool) -> &'static str {
        match ordered {
            true => "ol",
            false => "ul",
        }
    }

    let mut out = String::new();
    let mut open_list: Option<bool> = None;
    for block in blocks {
        let list = match block {
            Block::ListItem { ordered, .. } => Some(*ordered),
            _ => None,
        };
        if list != open_list {
            if let Some(ordered) = open_list {
                out.push_str(&format!("</{}>", list_tag(ordered)));
            }
            if let Some(ordered) = list {
                out.push_str(&format!("<{}>", list_tag(ordered)));
            }
            open_list = list;
        }
        block.push_html(&mut out, links)?;
    }
    if let Some(ordered) = open_list {
        out.push_str(&format!("</{}>", list_tag(ordered)));
    }
    Ok(out)
}

fn push_text(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Link { children, .. }
            | Inline::Label { children, .. } => push_text(out, children),
        }
    }
}

fn push_inline_html(
    out: &mut String,
    inlines: &[Inline],
    links: &LinkResolver,
) -> Result<(), url::ParseError> {
    for inline in inlines {
        match inline {
            Inline::Text(text) => {
                for (i, line) in text.split('\n').enumerate() {
                    if i > 0 {
                        out.push_str("<br />");
                    }
                    push_escaped(out, line);
                }
            }
            Inline::Strong(children) => {
                out.push_str("<strong>");
                push_inline_html(out, children, links)?;
                out.push_str("</strong>");
            }
            Inline::Emphasis(children) => {
                out.push_str("<em>");
                push_inline_html(out, children, links)?;
                out.push_str("</em>");
            }
            Inline::Link { target, children } => {
                out.push_str(r#"<a href=""#);
                push_escaped_href(out, &links.resolve(target)?);
                out.push_str(r#"">"#);
                push_inline_html(out, children, links)?;
                out.push_str("</a>");
            }
            Inline::Label { name, children } => {
                out.push_str(r#"<span class=""#);
                push_escaped(out, name);
                out.push_str(r#"">"#);
                push_inline_html(out, children, links)?;
                out.push_str("</span>");
            }
        }
    }
    Ok(())
}

// Writing into a `String` can't fail, so the `io::Result`s from the escape
// functions are dropped.
fn push_escaped(out: &mut String, s: &str) {
    let _ = escape_html(out, s);
}

fn push_escaped_href(out: &mut String, s: &str) {
    let _ = escape_href(out, s);
}

/// A rich text block as the CMS delivers it.
#[derive(Deserialize)]
struct RawBlock {
    #[serde(rename = "type")]
    kind: String,

    #[serde(default)]
    text: String,

    #[serde(default)]
    spans: Vec<RawSpan>,

    #[serde(default)]
    url: Option<String>,

    #[serde(default)]
    alt: Option<String>,

    #[serde(default)]
    oembed: Option<RawEmbed>,
}

#[derive(Deserialize)]
struct RawEmbed {
    #[serde(default)]
    html: Option<String>,
}

#[derive(Deserialize)]
struct RawSpan {
    start: usize,
    end: usize,

    #[serde(rename = "type")]
    kind: String,

    #[serde(default)]
    data: RawSpanData,
}

#[derive(Deserialize, Default)]
struct RawSpanData {
    #[serde(default)]
    link_type: Option<String>,

    #[serde(default)]
    url: Option<String>,

    #[serde(default)]
    uid: Option<String>,

    #[serde(default)]
    id: Option<String>,

    #[serde(default)]
    label: Option<String>,
}

impl TryFrom<RawBlock> for Block {
    type Error = String;

    fn try_from(raw: RawBlock) -> Result<Block, String> {
        let kind = raw.kind.as_str();
        Ok(match kind {
            "paragraph" => Block::Paragraph(nest_spans(&raw.text, &raw.spans)),
            "preformatted" => Block::Preformatted(raw.text),
            "list-item" | "o-list-item" => Block::ListItem {
                ordered: kind == "o-list-item",
                content: nest_spans(&raw.text, &raw.spans),
            },
            "image" => Block::Image {
                url: raw
                    .url
                    .ok_or_else(|| "image block without a `url`".to_owned())?,
                alt: raw.alt,
            },
            "embed" => Block::Embed {
                html: raw.oembed.and_then(|o| o.html).unwrap_or_default(),
            },
            _ => match kind
                .strip_prefix("heading")
                .and_then(|level| level.parse::<u8>().ok())
            {
                Some(level @ 1..=6) => Block::Heading {
                    level,
                    content: nest_spans(&raw.text, &raw.spans),
                },
                _ => return Err(format!("unsupported block type `{}`", kind)),
            },
        })
    }
}

/// A formatting span after interpretation of its `type` and `data`.
struct Mark {
    start: usize,
    end: usize,
    kind: MarkKind,
}

enum MarkKind {
    Strong,
    Emphasis,
    Link(LinkTarget),
    Label(String),
}

impl Mark {
    fn from_raw(raw: &RawSpan) -> Option<Mark> {
        let kind = match raw.kind.as_str() {
            "strong" => MarkKind::Strong,
            "em" => MarkKind::Emphasis,
            "hyperlink" => MarkKind::Link(
                match raw.data.link_type.as_deref() {
                    Some("Document") => LinkTarget::Document(
                        raw.data.uid.clone().or_else(|| raw.data.id.clone())?,
                    ),
                    _ => LinkTarget::Web(raw.data.url.clone()?),
                },
            ),
            "label" => MarkKind::Label(raw.data.label.clone()?),
            _ => return None,
        };
        Some(Mark {
            start: raw.start,
            end: raw.end,
            kind,
        })
    }

    fn wrap(&self, children: Vec<Inline>) -> Inline {
        match &self.kind {
            MarkKind::Strong => Inline::Strong(children),
            MarkKind::Emphasis => Inline::Emphasis(children),
            MarkKind::Link(target) => Inline::Link {
                target: target.clone(),
                children,
            },
            MarkKind::Label(name) => Inline::Label {
                name: name.clone(),
                children,
            },
        }
    }
}

/// Builds an inline tree from `text` and its flat span list. Span offsets are
/// character offsets. Spans nest by containment; a span that crosses the end
/// of its enclosing span is clipped to it. Unknown span types are ignored.
fn nest_spans(text: &str, spans: &[RawSpan]) -> Vec<Inline> {
    let chars: Vec<char> = text.chars().collect();
    let mut marks: Vec<Mark> = spans
        .iter()
        .filter(|span| span.start < span.end)
        .filter_map(Mark::from_raw)
        .collect();
    marks.sort_by(|a, b| match a.start.cmp(&b.start) {
        Ordering::Equal => b.end.cmp(&a.end),
        ordering => ordering,
    });
    let marks: Vec<&Mark> = marks.iter().collect();
    nest(&chars, 0, chars.len(), &marks)
}

fn nest(chars: &[char], start: usize, end: usize, marks: &[&Mark]) -> Vec<Inline> {
    let text = |from: usize, to: usize| Inline::Text(chars[from..to].iter().collect());

    let mut out = Vec::new();
    let mut pos = start;
    let mut i = 0;
    while i < marks.len() {
        let mark = marks[i];
        let mark_start = mark.start.max(pos).min(end);
        let mark_end = mark.end.max(mark_start).min(end);

        // Everything starting inside this mark is nested under it.
        let mut j = i + 1;
        while j < marks.len() && marks[j].start < mark_end {
            j += 1;
        }

        if mark_start > pos {
            out.push(text(pos, mark_start));
        }
        if mark_start < mark_end {
            let children = nest(chars, mark_start, mark_end, &marks[i + 1..j]);
            out.push(mark.wrap(children));
            pos = mark_end;
        }
        i = j;
    }
    if pos < end {
        out.push(text(pos, end));
    }
    out
}
