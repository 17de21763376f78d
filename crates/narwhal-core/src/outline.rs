//! Markdown heading extraction.
//!
//! Every ATX or setext heading becomes one [`Heading`] record. Its inline children are projected
//! into [`Rule`] items: text runs, links (href plus link text) and images (src only; alt text is
//! dropped).

use crate::model::Rule;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Markdown heading level, `1..=6`.
    pub depth: u8,
    /// 0-based source line of the heading's first character.
    pub line: usize,
    pub name: String,
    /// `None` when the heading has no inline content.
    pub rules: Option<Vec<Rule>>,
}

fn line_starts(text: &str) -> Vec<usize> {
    let mut out = vec![0];
    out.extend(text.match_indices('\n').map(|(i, _)| i + 1));
    out
}

fn line_of(starts: &[usize], offset: usize) -> usize {
    match starts.binary_search(&offset) {
        Ok(i) => i,
        Err(i) => i.saturating_sub(1),
    }
}

#[derive(Debug, Default)]
struct HeadingBuilder {
    depth: u8,
    line: usize,
    name: String,
    rules: Vec<Rule>,
    link: Option<(String, String)>,
    image_depth: usize,
    // Consecutive text events without a tag boundary are one run.
    text_open: bool,
}

impl HeadingBuilder {
    fn push_text(&mut self, text: &str) {
        if self.image_depth > 0 {
            return;
        }
        self.name.push_str(text);
        if let Some((_, content)) = self.link.as_mut() {
            content.push_str(text);
            return;
        }
        if self.text_open {
            if let Some(Rule::Text { content }) = self.rules.last_mut() {
                content.push_str(text);
                return;
            }
        }
        self.rules.push(Rule::Text {
            content: text.to_string(),
        });
        self.text_open = true;
    }

    fn finish(self) -> Heading {
        Heading {
            depth: self.depth,
            line: self.line,
            name: self.name.trim().to_string(),
            rules: if self.rules.is_empty() {
                None
            } else {
                Some(self.rules)
            },
        }
    }
}

/// Extracts every heading of a Markdown document, in document order.
pub fn extract_headings(text: &str) -> Vec<Heading> {
    let starts = line_starts(text);
    let parser = Parser::new_ext(
        text,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS,
    );

    let mut out = Vec::new();
    let mut cur: Option<HeadingBuilder> = None;

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                cur = Some(HeadingBuilder {
                    depth: level as u8,
                    line: line_of(&starts, range.start),
                    ..Default::default()
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(h) = cur.take() {
                    out.push(h.finish());
                }
            }
            event => {
                let Some(h) = cur.as_mut() else {
                    continue;
                };
                match event {
                    Event::Text(t) | Event::Code(t) => h.push_text(&t),
                    Event::SoftBreak | Event::HardBreak => h.push_text(" "),
                    Event::Start(Tag::Link { dest_url, .. }) => {
                        h.text_open = false;
                        h.link = Some((dest_url.to_string(), String::new()));
                    }
                    Event::End(TagEnd::Link) => {
                        h.text_open = false;
                        if let Some((href, content)) = h.link.take() {
                            h.rules.push(Rule::Link { href, content });
                        }
                    }
                    Event::Start(Tag::Image { dest_url, .. }) => {
                        h.text_open = false;
                        h.image_depth += 1;
                        h.rules.push(Rule::Image {
                            src: dest_url.to_string(),
                        });
                    }
                    Event::End(TagEnd::Image) => {
                        h.image_depth = h.image_depth.saturating_sub(1);
                    }
                    Event::Start(_) | Event::End(_) => h.text_open = false,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!(headings = out.len(), "extracted markdown outline");
    out
}
