// Word tokenizers.
//
// The default is a Penn Treebank style tokenizer built from an ordered list
// of regex rewrites: punctuation and contractions are padded with spaces,
// then the text is split on whitespace. A whitespace tokenizer is provided
// for callers that already hold clean, space-separated text.

use anyhow::{Context, Result};
use regex_lite::{Captures, Regex};

/// Trait for splitting raw text into word tokens.
///
/// Implementations must be deterministic: the same text always yields the
/// same token sequence.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Splits on Unicode whitespace and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

/// Abbreviations that keep their trailing period mid-text.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "inc", "co", "corp", "ltd", "llc", "jr", "sr", "st", "vs",
    "etc", "no", "approx", "dept", "est", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep",
    "sept", "oct", "nov", "dec", "u.s",
];

/// Rewrites applied before the text is padded with spaces.
const STARTING_RULES: &[(&str, &str)] = &[
    (r#"^""#, "``"),
    (r"(``)", " ${1} "),
    (r#"([ (\[{<])("|'')"#, "${1} `` "),
];

/// Punctuation and bracket rewrites.
const PUNCTUATION_RULES: &[(&str, &str)] = &[
    (r"([:,])([^\d])", " ${1} ${2}"),
    (r"([:,])$", " ${1} "),
    (r"\.\.\.", " ... "),
    (r"[;@#$%&]", " ${0} "),
    (r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2}${3} "),
    (r"[?!]", " ${0} "),
    (r"([^'])' ", "${1} ' "),
    (r"[\]\[(){}<>]", " ${0} "),
    (r"--", " -- "),
];

/// Closing quotes and clitics, applied to the space-padded text.
const ENDING_RULES: &[(&str, &str)] = &[
    (r"''", " '' "),
    (r#"""#, " '' "),
    (r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} "),
    (r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} "),
    (r"(?i)\b(can)(not)\b", " ${1} ${2} "),
    (r"(?i)\b(gon)(na)\b", " ${1} ${2} "),
    (r"(?i)\b(got)(ta)\b", " ${1} ${2} "),
    (r"(?i)\b(wan)(na)\b", " ${1} ${2} "),
];

/// Penn Treebank style word tokenizer.
///
/// Sentence-final periods are split off when followed by whitespace and an
/// upper-case letter, digit or quote, unless the preceding word is a known
/// abbreviation or a single-letter initial. Numbers such as `1,000` and
/// `3.5` stay whole.
pub struct TreebankTokenizer {
    starting: Vec<(Regex, &'static str)>,
    sentence_end: Regex,
    punctuation: Vec<(Regex, &'static str)>,
    ending: Vec<(Regex, &'static str)>,
}

impl TreebankTokenizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            starting: compile(STARTING_RULES)?,
            sentence_end: Regex::new(r#"([^.\s]+)\.(\s+)([A-Z0-9"'`])"#)
                .context("Failed to compile sentence boundary rule")?,
            punctuation: compile(PUNCTUATION_RULES)?,
            ending: compile(ENDING_RULES)?,
        })
    }

    fn split_sentence_ends(&self, text: &str) -> String {
        self.sentence_end
            .replace_all(text, |caps: &Captures| {
                let word = &caps[1];
                let keep = word.chars().count() == 1
                    || ABBREVIATIONS.contains(&word.to_lowercase().as_str());
                if keep {
                    format!("{}.{}{}", word, &caps[2], &caps[3])
                } else {
                    format!("{} .{}{}", word, &caps[2], &caps[3])
                }
            })
            .into_owned()
    }
}

impl Tokenizer for TreebankTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut text = text.to_string();
        for (re, rep) in &self.starting {
            text = re.replace_all(&text, *rep).into_owned();
        }
        text = self.split_sentence_ends(&text);
        for (re, rep) in &self.punctuation {
            text = re.replace_all(&text, *rep).into_owned();
        }
        let mut text = format!(" {text} ");
        for (re, rep) in &self.ending {
            text = re.replace_all(&text, *rep).into_owned();
        }
        text.split_whitespace().map(str::to_string).collect()
    }
}

fn compile(rules: &[(&str, &'static str)]) -> Result<Vec<(Regex, &'static str)>> {
    rules
        .iter()
        .map(|(pattern, rep)| {
            Regex::new(pattern)
                .with_context(|| format!("Failed to compile tokenizer rule {pattern}"))
                .map(|re| (re, *rep))
        })
        .collect()
}
