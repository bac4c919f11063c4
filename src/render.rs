//! Message renderer.
//!
//! Turns raw message text into a small DOM model: text, hyperlink and
//! line-break nodes wrapped in a message element. Replies may embed links as
//! `<link>URL</link>`; everything else is treated as literal text.

use std::fmt::{self, Write as _};
use std::sync::LazyLock;

use regex::Regex;

use crate::message::{Message, Origin};

pub const LINK_CLASS: &str = "chat-link";
pub const LINK_TARGET: &str = "_blank";
pub const LINK_REL: &str = "noopener noreferrer";
pub const AVATAR_ALT: &str = "Bot Avatar";

/// Number of animated dots in the typing indicator.
const TYPING_DOTS: usize = 3;

// Non-greedy so several links on one line stay separate.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<link>(.*?)</link>").expect("link pattern is valid"));

/// Identifier of an element appended to the conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn text(&self) -> &str {
        &self.href
    }

    pub fn target(&self) -> &'static str {
        LINK_TARGET
    }

    pub fn rel(&self) -> &'static str {
        LINK_REL
    }

    pub fn class(&self) -> &'static str {
        LINK_CLASS
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Link(Link),
    LineBreak,
}

impl Node {
    pub fn is_link(&self) -> bool {
        matches!(self, Node::Link(_))
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => {
                let _ = write!(out, "<span>{}</span>", escape_html(text));
            }
            Node::Link(link) => {
                let href = escape_html(&link.href);
                let _ = write!(
                    out,
                    "<a href=\"{href}\" target=\"{}\" rel=\"{}\" class=\"{}\">{href}</a>",
                    link.target(),
                    link.rel(),
                    link.class()
                );
            }
            Node::LineBreak => out.push_str("<br>"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Avatar {
    pub src: String,
    pub alt: &'static str,
}

impl Avatar {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into(), alt: AVATAR_ALT }
    }
}

/// A rendered chat message: optional avatar followed by the content nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageElement {
    pub origin: Origin,
    pub avatar: Option<Avatar>,
    pub content: Vec<Node>,
}

impl MessageElement {
    /// Visible text of the content, with line breaks as `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.content {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Link(link) => out.push_str(link.text()),
                Node::LineBreak => out.push('\n'),
            }
        }
        out
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.content.iter().filter_map(|node| match node {
            Node::Link(link) => Some(link),
            _ => None,
        })
    }
}

/// Anything that can be placed in the conversation container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Element {
    Message(MessageElement),
    Typing { avatar: Avatar },
}

impl Element {
    pub fn as_message(&self) -> Option<&MessageElement> {
        match self {
            Element::Message(message) => Some(message),
            Element::Typing { .. } => None,
        }
    }

    pub fn is_typing(&self) -> bool {
        matches!(self, Element::Typing { .. })
    }

    pub fn to_html(&self, id: Option<ElementId>) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    pub fn write_html(&self, id: Option<ElementId>, out: &mut String) {
        let (origin, avatar) = match self {
            Element::Message(message) => (message.origin, message.avatar.as_ref()),
            Element::Typing { avatar } => (Origin::Bot, Some(avatar)),
        };

        out.push_str("<div class=\"message ");
        out.push_str(origin.class());
        out.push('"');
        if let Some(id) = id {
            let _ = write!(out, " id=\"{id}\"");
        }
        out.push('>');

        if let Some(avatar) = avatar {
            let _ = write!(
                out,
                "<div class=\"bot-avatar\"><img src=\"{}\" alt=\"{}\"></div>",
                escape_html(&avatar.src),
                escape_html(avatar.alt)
            );
        }

        match self {
            Element::Message(message) => {
                out.push_str("<div class=\"message-content\">");
                for node in &message.content {
                    node.write_html(out);
                }
                out.push_str("</div>");
            }
            Element::Typing { .. } => {
                out.push_str("<div class=\"message-content loading\"><div class=\"typing-indicator\">");
                for _ in 0..TYPING_DOTS {
                    out.push_str("<span>.</span>");
                }
                out.push_str("</div></div>");
            }
        }

        out.push_str("</div>");
    }
}

/// Split one line into literal text and link nodes.
fn render_line(line: &str, nodes: &mut Vec<Node>) {
    let mut last = 0;
    for caps in LINK_RE.captures_iter(line) {
        let (Some(whole), Some(url)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_text(&line[last..whole.start()], nodes);
        nodes.push(Node::Link(Link { href: url.as_str().to_string() }));
        last = whole.end();
    }
    push_text(&line[last..], nodes);
}

fn push_text(text: &str, nodes: &mut Vec<Node>) {
    if !text.is_empty() {
        nodes.push(Node::Text(text.to_string()));
    }
}

/// Render raw message text into content nodes.
///
/// Lines are separated by exactly one [`Node::LineBreak`], with no break
/// after the last line. An unterminated `<link>` stays literal text.
pub fn render_content(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            nodes.push(Node::LineBreak);
        }
        render_line(line, &mut nodes);
    }
    nodes
}

/// Render a full message element. Bot messages get the avatar.
pub fn render_message(message: &Message, avatar_src: &str) -> MessageElement {
    let avatar = match message.origin {
        Origin::Bot => Some(Avatar::new(avatar_src)),
        Origin::User => None,
    };
    MessageElement {
        origin: message.origin,
        avatar,
        content: render_content(&message.text),
    }
}

pub fn typing_indicator(avatar_src: &str) -> Element {
    Element::Typing { avatar: Avatar::new(avatar_src) }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_around_links() {
        let nodes = render_content("see <link>https://a.example</link> and <link>https://b.example</link>!");
        assert_eq!(
            nodes,
            vec![
                Node::Text("see ".into()),
                Node::Link(Link { href: "https://a.example".into() }),
                Node::Text(" and ".into()),
                Node::Link(Link { href: "https://b.example".into() }),
                Node::Text("!".into()),
            ]
        );
    }

    #[test]
    fn empty_line_keeps_break() {
        let nodes = render_content("a\n\nb");
        assert_eq!(
            nodes,
            vec![
                Node::Text("a".into()),
                Node::LineBreak,
                Node::LineBreak,
                Node::Text("b".into()),
            ]
        );
    }

    #[test]
    fn empty_link_is_still_a_link() {
        let nodes = render_content("<link></link>");
        assert_eq!(nodes, vec![Node::Link(Link { href: String::new() })]);
    }

    #[test]
    fn escapes_markup_in_text() {
        assert_eq!(escape_html("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn element_id_formats_as_dom_id() {
        assert_eq!(ElementId(7).to_string(), "msg-7");
    }
}
