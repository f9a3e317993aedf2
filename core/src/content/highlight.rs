use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::CodeSample;

const THEME: &str = "base16-ocean.dark";

static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
static THEMES: OnceLock<ThemeSet> = OnceLock::new();

fn syntaxes() -> &'static SyntaxSet {
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn themes() -> &'static ThemeSet {
    THEMES.get_or_init(ThemeSet::load_defaults)
}

/// A code sample ready for the code dialog: one HTML string per source line.
#[derive(Clone, Debug, PartialEq)]
pub struct Highlighted {
    pub label: String,
    pub lines: Vec<String>,
}

pub fn highlight(sample: &CodeSample) -> Highlighted {
    let set = syntaxes();
    let syntax = sample
        .language
        .as_deref()
        .and_then(|lang| set.find_syntax_by_token(lang))
        .unwrap_or_else(|| set.find_syntax_plain_text());

    let lines = match themes().themes.get(THEME) {
        Some(theme) => {
            let mut highlighter = HighlightLines::new(syntax, theme);
            LinesWithEndings::from(&sample.source)
                .map(|line| {
                    highlighter
                        .highlight_line(line, set)
                        .and_then(|ranges| {
                            styled_line_to_highlighted_html(&ranges, IncludeBackground::No)
                        })
                        .unwrap_or_else(|err| {
                            tracing::warn!(%err, "highlighting failed, using plain text");
                            ammonia::clean_text(line)
                        })
                })
                .collect()
        }
        None => LinesWithEndings::from(&sample.source)
            .map(ammonia::clean_text)
            .collect(),
    };

    Highlighted {
        label: sample.label(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_entry_per_line() {
        let out = highlight(&CodeSample {
            language: Some("rust".into()),
            source: "let a = 1;\nlet b = 2;\n".into(),
        });
        assert_eq!(out.label, "RUST");
        assert_eq!(out.lines.len(), 2);
        assert!(out.lines[0].contains("<span"));
    }

    #[test]
    fn unknown_language_still_escapes() {
        let out = highlight(&CodeSample {
            language: Some("nosuchlang".into()),
            source: "<b>".into(),
        });
        assert_eq!(out.lines.len(), 1);
        assert!(!out.lines[0].contains("<b>"));
    }
}
