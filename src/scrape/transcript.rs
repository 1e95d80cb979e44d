// Transcript extraction from an earnings-call article page.
//
// Speaker names are rendered in <strong> tags and the body in <p> tags. The
// prepared remarks start at the first speaker after the opening "Operator"
// line and end at the last "Question-and-Answer Session" marker. This is
// tied to one site's markup; when it changes, only this file should need to.

use regex_lite::Regex;
use tracing::{debug, warn};

use crate::error::PipelineError;

pub const OPERATOR_MARKER: &str = "Operator";
pub const QA_MARKER: &str = "Question-and-Answer Session";

/// Compiled element patterns, reused across pages.
pub struct TranscriptExtractor {
    strong: Regex,
    paragraph: Regex,
    tag: Regex,
    entity: Regex,
}

impl TranscriptExtractor {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            strong: Regex::new(r"(?is)<strong\b[^>]*>(.*?)</strong\s*>")?,
            paragraph: Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>")?,
            tag: Regex::new(r"(?s)<[^>]*>")?,
            entity: Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);")?,
        })
    }

    /// Visible text of every `<tag>` element, in document order.
    fn element_texts(&self, pattern: &Regex, html: &str) -> Vec<String> {
        pattern
            .captures_iter(html)
            .map(|caps| self.visible_text(&caps[1]))
            .collect()
    }

    /// Drop nested tags and decode character references.
    fn visible_text(&self, inner: &str) -> String {
        let stripped = self.tag.replace_all(inner, "");
        self.entity
            .replace_all(&stripped, |caps: &regex_lite::Captures| {
                decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Cut the prepared-remarks transcript out of a page.
    pub fn extract(&self, html: &str) -> Result<String, PipelineError> {
        let strong: Vec<String> = self
            .element_texts(&self.strong, html)
            .into_iter()
            .map(|s| s.trim().to_string())
            .collect();

        let operator = strong
            .iter()
            .position(|s| s == OPERATOR_MARKER)
            .ok_or_else(|| PipelineError::scrape_format("no \"Operator\" speaker heading"))?;

        let speaker_at = |i: usize| {
            strong.get(i).ok_or_else(|| {
                PipelineError::scrape_format(format!(
                    "speaker list ends {} headings after \"Operator\"",
                    i - operator
                ))
            })
        };

        let mut first_speaker = speaker_at(operator + 2)?;
        if first_speaker == OPERATOR_MARKER {
            first_speaker = speaker_at(operator + 3)?;
        } else if first_speaker == QA_MARKER {
            first_speaker = speaker_at(operator + 1)?;
        }
        debug!(speaker = first_speaker.as_str(), "Located first speaker");

        let text = self.element_texts(&self.paragraph, html).join("\n");

        let start = text
            .find(&format!("{first_speaker}\n"))
            .ok_or_else(|| {
                PipelineError::scrape_format(format!(
                    "speaker \"{first_speaker}\" not found in body text"
                ))
            })?;
        let end = text
            .rfind(QA_MARKER)
            .ok_or_else(|| PipelineError::scrape_format("no \"Question-and-Answer Session\" marker"))?;

        if end < start {
            warn!(start, end, "Q&A marker precedes the first speaker; transcript is empty");
            return Ok(String::new());
        }

        Ok(text[start..end].to_string())
    }
}

fn decode_entity(name: &str) -> Option<String> {
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "rsquo" => '\u{2019}',
        "lsquo" => '\u{2018}',
        "rdquo" => '\u{201d}',
        "ldquo" => '\u{201c}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "hellip" => '\u{2026}',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some(decoded.to_string())
}
