//! Sentence-boundary splitting.

use std::collections::HashSet;

use std::ops::Range;

use textsplit_core::{Segmenter, SplitterConfig};

use crate::boundary::{trimmed_span, BoundarySplitter, SpanSegmenter};

/// Abbreviations that do not end a sentence by default.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    // Honorifics and titles
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "rev.", "hon.", "gen.", "col.",
    "lt.", "capt.", "sgt.", "gov.", "sen.", "rep.",
    // Latin and common
    "etc.", "e.g.", "i.e.", "vs.", "cf.", "al.", "approx.", "dept.", "est.", "fig.", "no.",
    "nos.", "vol.", "inc.", "ltd.", "co.", "corp.",
    // Months and days
    "jan.", "feb.", "mar.", "apr.", "jun.", "jul.", "aug.", "sep.", "sept.", "oct.", "nov.",
    "dec.", "mon.", "tue.", "wed.", "thu.", "fri.", "sat.", "sun.",
    // Units, times and places
    "a.m.", "p.m.", "u.s.", "u.k.", "ft.", "lb.", "lbs.", "oz.", "km.", "cm.", "mm.", "kg.",
    "mt.", "ave.", "blvd.",
];

/// Sentence splitter: sentences packed up to `chunk_size`.
pub type SentenceSplitter = BoundarySplitter<SentenceSegmenter>;

impl BoundarySplitter<SentenceSegmenter> {
    /// Create a sentence splitter with the default abbreviations.
    pub fn new(config: SplitterConfig) -> Self {
        Self::with_segmenter(config, SentenceSegmenter::new())
    }
}

/// Finds sentence boundaries.
///
/// A sentence ends at `.`, `!` or `?` (including runs such as `?!` and any
/// closing quotes or brackets after them) when whitespace follows and the
/// next word starts with an uppercase letter or an opening quote or
/// bracket. A `.` that ends a known abbreviation is not a boundary.
/// Full-width CJK terminators always end a sentence.
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    abbreviations: HashSet<String>,
}

impl SentenceSegmenter {
    /// Create a segmenter with [`DEFAULT_ABBREVIATIONS`].
    pub fn new() -> Self {
        Self::with_abbreviations(DEFAULT_ABBREVIATIONS.iter().copied())
    }

    /// Create a segmenter with exactly the given abbreviations.
    ///
    /// Matching is case-insensitive; include the trailing `.`.
    pub fn with_abbreviations<I, S>(abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            abbreviations: abbreviations
                .into_iter()
                .map(|a| a.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Add one abbreviation.
    pub fn add_abbreviation(mut self, abbreviation: &str) -> Self {
        self.abbreviations.insert(abbreviation.to_lowercase());
        self
    }

    /// Check whether `word` is a known abbreviation.
    pub fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(&word.to_lowercase())
    }

    /// Byte offsets just past each sentence end, excluding the end of text.
    fn boundaries(&self, text: &str) -> Vec<usize> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let offset = |k: usize| chars.get(k).map_or(text.len(), |&(pos, _)| pos);
        let mut ends = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let (pos, c) = chars[i];
            if is_cjk_terminal(c) {
                ends.push(pos + c.len_utf8());
                i += 1;
                continue;
            }
            if !is_terminal(c) {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < chars.len() && (is_terminal(chars[j].1) || is_closing(chars[j].1)) {
                j += 1;
            }

            let mut k = j;
            while k < chars.len() && chars[k].1.is_whitespace() {
                k += 1;
            }
            if k == j || k == chars.len() {
                i = j.max(i + 1);
                continue;
            }

            let next = chars[k].1;
            let starts_sentence = next.is_uppercase() || is_opening(next);
            if starts_sentence && !(c == '.' && self.ends_abbreviation(&text[..pos + 1])) {
                ends.push(offset(j));
            }
            i = k;
        }

        ends
    }

    /// Whether the word ending at the final `.` of `prefix` is an abbreviation.
    fn ends_abbreviation(&self, prefix: &str) -> bool {
        let word_start = prefix
            .rfind(char::is_whitespace)
            .map_or(0, |ws| ws + prefix[ws..].chars().next().map_or(1, char::len_utf8));
        let word = prefix[word_start..].trim_start_matches(is_opening);
        self.is_abbreviation(word)
    }
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for SentenceSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        self.spans(text)
            .into_iter()
            .map(|span| text[span].to_string())
            .collect()
    }

    fn join_separator(&self) -> &str {
        " "
    }
}

impl SpanSegmenter for SentenceSegmenter {
    fn spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut start = 0;
        for end in self.boundaries(text).into_iter().chain(std::iter::once(text.len())) {
            spans.extend(trimmed_span(text, start..end));
            start = end;
        }
        spans
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_cjk_terminal(c: char) -> bool {
    matches!(c, '。' | '！' | '？')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | '”' | '’' | ')' | ']' | '»')
}

fn is_opening(c: char) -> bool {
    matches!(c, '"' | '\'' | '“' | '‘' | '(' | '[' | '«')
}
