//! Rich-text content: sanitizing editor output and turning stored HTML
//! into typed blocks the UI renders without `inner_html`.

mod highlight;

pub use highlight::{highlight, Highlighted};

use scraper::{ElementRef, Html};

pub const UNORDERED_LIST_CLASS: &str = "list-disc pl-5";
pub const ORDERED_LIST_CLASS: &str = "list-decimal pl-5";
pub const QUOTE_CLASS: &str = "border-l-4 border-slate-400 pl-4 italic text-slate-300";

pub const DEFAULT_IMAGE_ALT: &str = "Image";
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

pub const LINK_TARGET: &str = "_blank";
pub const LINK_REL: &str = "noopener noreferrer";

pub const PREVIEW_CHARS: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InlineTag {
    Bold,
    Italic,
    Strike,
    Underline,
    Code,
}

impl InlineTag {
    fn from_tag(name: &str) -> Option<Self> {
        match name {
            "strong" | "b" => Some(InlineTag::Bold),
            "em" | "i" => Some(InlineTag::Italic),
            "s" | "strike" | "del" => Some(InlineTag::Strike),
            "u" => Some(InlineTag::Underline),
            "code" => Some(InlineTag::Code),
            _ => None,
        }
    }
}

/// A `<pre>` region: raw source plus the language from a `language-*` class.
#[derive(Clone, Debug, PartialEq)]
pub struct CodeSample {
    pub language: Option<String>,
    pub source: String,
}

impl CodeSample {
    /// Upper-cased language, "CODE" when none was declared.
    pub fn label(&self) -> String {
        self.language
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(|| "CODE".to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Text(String),
    Break,
    Inline(InlineTag, Vec<Node>),
    Heading(u8, Vec<Node>),
    Paragraph(Vec<Node>),
    List { ordered: bool, items: Vec<Vec<Node>> },
    Quote(Vec<Node>),
    Image { src: String, alt: String },
    Link { href: String, children: Vec<Node> },
    Code(CodeSample),
    Rule,
}

/// Clean editor output down to the vocabulary the renderer understands.
pub fn sanitize(html: &str) -> String {
    ammonia::Builder::default()
        .add_url_schemes(&["data"])
        .add_tag_attributes("code", &["class"])
        .add_tag_attributes("pre", &["class"])
        .link_rel(Some(LINK_REL))
        .set_tag_attribute_value("a", "target", LINK_TARGET)
        .clean(html)
        .to_string()
}

/// Escape text for insertion into HTML.
pub fn escape(text: &str) -> String {
    ammonia::clean_text(text)
}

pub fn parse(content: Option<&str>) -> Vec<Node> {
    let Some(content) = content.filter(|c| !c.trim().is_empty()) else {
        return Vec::new();
    };
    let fragment = Html::parse_fragment(content);
    children(fragment.root_element())
        .into_iter()
        .filter(|node| !matches!(node, Node::Text(text) if text.trim().is_empty()))
        .collect()
}

fn children(element: ElementRef<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            nodes.push(Node::Text(text.text.to_string()));
        } else if let Some(child) = ElementRef::wrap(child) {
            nodes.extend(convert(child));
        }
    }
    nodes
}

fn convert(element: ElementRef<'_>) -> Vec<Node> {
    let name = element.value().name();
    let node = match name {
        "p" | "div" => Node::Paragraph(children(element)),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = name[1..].parse().unwrap_or(1);
            Node::Heading(level, children(element))
        }
        "ul" | "ol" => Node::List {
            ordered: name == "ol",
            items: element
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|li| li.value().name() == "li")
                .map(children)
                .collect(),
        },
        "blockquote" => Node::Quote(children(element)),
        "pre" => Node::Code(code_sample(element)),
        "img" => image(element),
        "a" => match element.value().attr("href") {
            Some(href) => Node::Link {
                href: href.to_string(),
                children: children(element),
            },
            None => return children(element),
        },
        "br" => Node::Break,
        "hr" => Node::Rule,
        other => match InlineTag::from_tag(other) {
            Some(tag) => Node::Inline(tag, children(element)),
            None => return children(element),
        },
    };
    vec![node]
}

fn image(element: ElementRef<'_>) -> Node {
    let attr = |name| {
        element
            .value()
            .attr(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    Node::Image {
        src: attr("src").unwrap_or(PLACEHOLDER_IMAGE).to_string(),
        alt: attr("alt").unwrap_or(DEFAULT_IMAGE_ALT).to_string(),
    }
}

fn code_sample(pre: ElementRef<'_>) -> CodeSample {
    let code = pre
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "code");
    let language = code
        .and_then(language_of)
        .or_else(|| language_of(pre));
    CodeSample {
        language,
        source: code_text(pre),
    }
}

/// Text under `pre`, with each `<br>` kept as a line break.
fn code_text(pre: ElementRef<'_>) -> String {
    let mut source = String::new();
    for node in pre.descendants() {
        match node.value() {
            scraper::Node::Text(text) => source.push_str(text),
            scraper::Node::Element(el) if el.name() == "br" => source.push('\n'),
            _ => {}
        }
    }
    source
}

fn language_of(element: ElementRef<'_>) -> Option<String> {
    element
        .value()
        .classes()
        .find_map(|class| class.strip_prefix("language-"))
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// Text content with runs of whitespace collapsed.
pub fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// List-row preview: the first `max` characters of the text, with "..."
/// appended when anything was cut.
pub fn preview(html: Option<&str>, max: usize) -> String {
    let text = plain_text(html.unwrap_or_default());
    if text.chars().count() <= max {
        return text;
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    #[test]
    fn empty_content_has_no_nodes() {
        assert!(parse(None).is_empty());
        assert!(parse(Some("")).is_empty());
        assert!(parse(Some("   ")).is_empty());
    }

    #[test]
    fn image_becomes_an_image_node() {
        assert_eq!(
            parse(Some(r#"<img src="X">"#)),
            vec![Node::Image {
                src: "X".into(),
                alt: DEFAULT_IMAGE_ALT.into()
            }]
        );
        assert_eq!(
            parse(Some(r#"<img alt="chart">"#)),
            vec![Node::Image {
                src: PLACEHOLDER_IMAGE.into(),
                alt: "chart".into()
            }]
        );
    }

    #[test]
    fn pre_becomes_code_but_inline_code_stays_inline() {
        let nodes = parse(Some(
            r#"<p>use <code>x</code></p><pre><code class="language-rust">fn main() {}
</code></pre>"#,
        ));
        assert_eq!(
            nodes,
            vec![
                Node::Paragraph(vec![
                    text("use "),
                    Node::Inline(InlineTag::Code, vec![text("x")])
                ]),
                Node::Code(CodeSample {
                    language: Some("rust".into()),
                    source: "fn main() {}\n".into()
                }),
            ]
        );
    }

    #[test]
    fn line_breaks_inside_pre_become_newlines() {
        let nodes = parse(Some("<pre>let a = 1;<br>let b = 2;</pre>"));
        let [Node::Code(sample)] = nodes.as_slice() else {
            panic!("expected one code node, got {nodes:?}");
        };
        assert_eq!(sample.source, "let a = 1;\nlet b = 2;");
        assert_eq!(highlight(sample).lines.len(), 2);
    }

    #[test]
    fn lists_headings_and_quotes() {
        let nodes = parse(Some(
            "<h2>Title</h2><ol><li>one</li><li><strong>two</strong></li></ol><blockquote>q</blockquote><hr>",
        ));
        assert_eq!(
            nodes,
            vec![
                Node::Heading(2, vec![text("Title")]),
                Node::List {
                    ordered: true,
                    items: vec![
                        vec![text("one")],
                        vec![Node::Inline(InlineTag::Bold, vec![text("two")])]
                    ]
                },
                Node::Quote(vec![text("q")]),
                Node::Rule,
            ]
        );
    }

    #[test]
    fn unknown_elements_keep_their_children() {
        assert_eq!(
            parse(Some("<p><span>hi</span><br></p>")),
            vec![Node::Paragraph(vec![text("hi"), Node::Break])]
        );
    }

    #[test]
    fn sanitize_strips_scripts_and_forces_safe_links() {
        let clean = sanitize(
            r#"<p onclick="x()">hi<script>alert(1)</script></p><a href="https://example.com">l</a>"#,
        );
        assert!(!clean.contains("script"));
        assert!(!clean.contains("onclick"));
        assert!(clean.contains(r#"rel="noopener noreferrer""#));
        assert!(clean.contains(r#"target="_blank""#));
    }

    #[test]
    fn sanitize_keeps_data_images_and_code_language() {
        let clean = sanitize(
            r#"<img src="data:image/png;base64,AAAA"><pre><code class="language-js">x</code></pre>"#,
        );
        assert!(clean.contains("data:image/png;base64,AAAA"));
        assert!(clean.contains(r#"class="language-js""#));
    }

    #[test]
    fn escaped_text_parses_back_to_itself() {
        let raw = "a < b && <script>";
        let html = format!("<code>{}</code>", escape(raw));
        assert_eq!(
            parse(Some(&html)),
            vec![Node::Inline(InlineTag::Code, vec![text(raw)])]
        );
    }

    #[test]
    fn preview_truncates_at_fifty_chars() {
        let long = format!("<p>{}</p>", "a".repeat(80));
        let cut = preview(Some(&long), PREVIEW_CHARS);
        assert_eq!(cut, format!("{}...", "a".repeat(50)));
        assert_eq!(preview(Some("<p>short  text</p>"), PREVIEW_CHARS), "short text");
        assert_eq!(preview(None, PREVIEW_CHARS), "");
    }

    #[test]
    fn label_defaults_to_code() {
        let sample = CodeSample {
            language: None,
            source: String::new(),
        };
        assert_eq!(sample.label(), "CODE");
        let sample = CodeSample {
            language: Some("python".into()),
            ..sample
        };
        assert_eq!(sample.label(), "PYTHON");
    }
}
