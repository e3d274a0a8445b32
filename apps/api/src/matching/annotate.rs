#![allow(dead_code)]

//! Span annotation: marks keyword occurrences without touching the source text.
//!
//! All spans are computed against the immutable original, overlaps are
//! resolved once, and the marked-up string is rendered in a single pass.
//! A rendered string never gets re-scanned, so one annotation cannot match
//! markup produced by another.
//!
//! Offsets are UTF-8 byte offsets on char boundaries of the source.

use std::collections::BTreeMap;

use regex::RegexBuilder;
use serde::{Serialize, Serializer};
use tracing::warn;

pub const LABEL_KEYWORD: &str = "keyword";
pub const LABEL_EMPHASIS: &str = "emphasis";
pub const LABEL_REWRITE: &str = "rewrite";

const MARK_OPEN_PREFIX: &str = "<mark data-label=\"";
const MARK_OPEN_SUFFIX: &str = "\">";
const MARK_CLOSE: &str = "</mark>";

const ENTITIES: &[(&str, char)] = &[("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>'), ("&quot;", '"')];

// ────────────────────────────────────────────────────────────────────────────
// Spans
// ────────────────────────────────────────────────────────────────────────────

/// A labeled range of the source text. A span with a `replacement` renders
/// that text instead of the covered source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationSpan {
    pub start: usize,
    pub end: usize,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl AnnotationSpan {
    pub fn highlight(start: usize, end: usize, label: &str) -> Self {
        Self {
            start,
            end,
            label: label.to_string(),
            replacement: None,
        }
    }

    pub fn rewrite(start: usize, end: usize, label: &str, replacement: &str) -> Self {
        Self {
            start,
            end,
            label: label.to_string(),
            replacement: Some(replacement.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn alters_content(&self) -> bool {
        self.replacement.is_some()
    }

    pub fn overlaps(&self, other: &AnnotationSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    fn display_text<'a>(&'a self, source: &'a str) -> &'a str {
        match &self.replacement {
            Some(replacement) => replacement,
            None => &source[self.start..self.end],
        }
    }
}

/// Resolves overlapping spans into a non-overlapping list sorted by start.
///
/// Precedence: content-altering spans first, then earliest start, then
/// longest, then earliest in the input order.
pub fn merge_spans(spans: Vec<AnnotationSpan>) -> Vec<AnnotationSpan> {
    let mut candidates: Vec<(usize, AnnotationSpan)> = spans
        .into_iter()
        .filter(|span| !span.is_empty())
        .enumerate()
        .collect();

    candidates.sort_by(|(ia, a), (ib, b)| {
        b.alters_content()
            .cmp(&a.alters_content())
            .then(a.start.cmp(&b.start))
            .then(b.len().cmp(&a.len()))
            .then(ia.cmp(ib))
    });

    // Accepted spans never overlap, so only the nearest neighbour on each
    // side of a candidate can collide with it.
    let mut accepted: BTreeMap<usize, AnnotationSpan> = BTreeMap::new();
    for (_, span) in candidates {
        let before = accepted.range(..span.start).next_back();
        let after = accepted.range(span.start..).next();
        let collides = before.is_some_and(|(_, kept)| kept.overlaps(&span))
            || after.is_some_and(|(_, kept)| kept.overlaps(&span));
        if !collides {
            accepted.insert(span.start, span);
        }
    }

    accepted.into_values().collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Whole-word search
// ────────────────────────────────────────────────────────────────────────────

/// Case-insensitive, whole-word occurrences of `phrase` in `text`.
///
/// A match counts when neither neighbouring character is alphanumeric or `_`.
/// This works for phrases that begin or end in punctuation (`c++`), where a
/// regex `\b` would not. The phrase is searched exactly as given; an edge
/// that is already whitespace (`"Worked as a "`) needs no boundary check.
pub fn find_whole_word(text: &str, phrase: &str) -> Vec<(usize, usize)> {
    if phrase.trim().is_empty() || text.is_empty() {
        return vec![];
    }

    let re = match RegexBuilder::new(&regex::escape(phrase))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            warn!("Skipping unmatchable phrase ({} bytes): {e}", phrase.len());
            return vec![];
        }
    };

    let check_before = !phrase.starts_with(char::is_whitespace);
    let check_after = !phrase.ends_with(char::is_whitespace);

    let mut found = Vec::new();
    let mut pos = 0;
    while pos <= text.len() {
        let Some(m) = re.find_at(text, pos) else {
            break;
        };
        let bounded_before =
            !check_before || !char_before(text, m.start()).is_some_and(is_word_char);
        let bounded_after =
            !check_after || !char_after(text, m.end()).is_some_and(is_word_char);
        if bounded_before && bounded_after {
            found.push((m.start(), m.end()));
            pos = m.end();
        } else {
            // Retry one character further so a bounded match starting inside
            // this rejected one is still found.
            pos = text[m.start()..]
                .chars()
                .next()
                .map_or(text.len() + 1, |c| m.start() + c.len_utf8());
        }
    }
    found
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn char_before(text: &str, at: usize) -> Option<char> {
    text[..at].chars().next_back()
}

fn char_after(text: &str, at: usize) -> Option<char> {
    text[at..].chars().next()
}

// ────────────────────────────────────────────────────────────────────────────
// Annotated text
// ────────────────────────────────────────────────────────────────────────────

/// Original text plus resolved, non-overlapping spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedText {
    source: String,
    spans: Vec<AnnotationSpan>,
}

/// Serialized form handed to API callers.
#[derive(Debug, Serialize)]
pub struct AnnotatedTextView<'a> {
    pub source: &'a str,
    pub spans: &'a [AnnotationSpan],
    pub rendered: String,
    pub plain: String,
}

impl AnnotatedText {
    /// Builds an annotated text, discarding spans that fall outside the
    /// source or off char boundaries, then resolving overlaps.
    pub fn new(source: impl Into<String>, spans: Vec<AnnotationSpan>) -> Self {
        let source = source.into();
        let valid = spans
            .into_iter()
            .filter(|s| {
                s.start < s.end
                    && s.end <= source.len()
                    && source.is_char_boundary(s.start)
                    && source.is_char_boundary(s.end)
            })
            .collect();
        Self {
            spans: merge_spans(valid),
            source,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn spans(&self) -> &[AnnotationSpan] {
        &self.spans
    }

    pub fn spans_labeled<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a AnnotationSpan> {
        self.spans.iter().filter(move |s| s.label == label)
    }

    /// HTML-escaped text with each span wrapped in a `<mark data-label>` element.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.source.len() + self.spans.len() * 32);
        let mut cursor = 0;
        for span in &self.spans {
            escape_into(&mut out, &self.source[cursor..span.start]);
            out.push_str(MARK_OPEN_PREFIX);
            escape_into(&mut out, &span.label);
            out.push_str(MARK_OPEN_SUFFIX);
            escape_into(&mut out, span.display_text(&self.source));
            out.push_str(MARK_CLOSE);
            cursor = span.end;
        }
        escape_into(&mut out, &self.source[cursor..]);
        out
    }

    /// Text with replacements applied and no markup.
    pub fn plain_text(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for span in &self.spans {
            out.push_str(&self.source[cursor..span.start]);
            out.push_str(span.display_text(&self.source));
            cursor = span.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }

    pub fn view(&self) -> AnnotatedTextView<'_> {
        AnnotatedTextView {
            source: &self.source,
            spans: &self.spans,
            rendered: self.render(),
            plain: self.plain_text(),
        }
    }
}

impl Serialize for AnnotatedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.view().serialize(serializer)
    }
}

/// Marks every whole-word, case-insensitive occurrence of any keyword.
/// An empty keyword list returns the text unmarked.
pub fn annotate<S: AsRef<str>>(text: &str, keywords: &[S], label: &str) -> AnnotatedText {
    AnnotatedText::new(text, highlight_spans(text, keywords, label))
}

/// Raw, unmerged highlight spans for `keywords` in `text`.
pub fn highlight_spans<S: AsRef<str>>(text: &str, keywords: &[S], label: &str) -> Vec<AnnotationSpan> {
    keywords
        .iter()
        .flat_map(|kw| find_whole_word(text, kw.as_ref()))
        .map(|(start, end)| AnnotationSpan::highlight(start, end, label))
        .collect()
}

/// Removes markers from rendered output and undoes the escaping.
/// `strip_markup(&t.render()) == t.plain_text()` for every `AnnotatedText`.
pub fn strip_markup(rendered: &str) -> String {
    let mut out = String::with_capacity(rendered.len());
    let mut rest = rendered;

    'scan: while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix(MARK_OPEN_PREFIX) {
            if let Some(close) = after.find(MARK_OPEN_SUFFIX) {
                rest = &after[close + MARK_OPEN_SUFFIX.len()..];
                continue;
            }
        }
        if let Some(after) = rest.strip_prefix(MARK_CLOSE) {
            rest = after;
            continue;
        }
        if rest.starts_with('&') {
            for (entity, ch) in ENTITIES {
                if let Some(after) = rest.strip_prefix(entity) {
                    out.push(*ch);
                    rest = after;
                    continue 'scan;
                }
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_keyword_list_is_identity() {
        let text = "Built <fast> & \"safe\" services";
        let annotated = annotate::<&str>(text, &[], LABEL_KEYWORD);
        assert!(annotated.spans().is_empty());
        assert_eq!(annotated.plain_text(), text);
        assert_eq!(strip_markup(&annotated.render()), text);
    }

    #[test]
    fn test_marks_whole_words_case_insensitively() {
        let annotated = annotate("React dev, reactive UI, REACT", &["react"], LABEL_KEYWORD);
        let covered: Vec<&str> = annotated
            .spans()
            .iter()
            .map(|s| &annotated.source()[s.start..s.end])
            .collect();
        assert_eq!(covered, vec!["React", "REACT"]);
        assert_eq!(
            annotated.render(),
            "<mark data-label=\"keyword\">React</mark> dev, reactive UI, <mark data-label=\"keyword\">REACT</mark>"
        );
    }

    #[test]
    fn test_overlapping_keywords_prefer_earliest_then_longest() {
        let annotated = annotate(
            "Machine learning and learning",
            &["learning", "machine learning"],
            LABEL_KEYWORD,
        );
        let spans = annotated.spans();
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end), (0, 16));
        assert_eq!(&annotated.source()[spans[1].start..spans[1].end], "learning");
        assert_eq!(spans[1].start, 21);
    }

    #[test]
    fn test_keyword_inside_markup_text_is_not_rematched() {
        // "mark" and "label" appear in the marker syntax; they must only
        // match the source, never the rendered output.
        let text = "mark the label";
        let annotated = annotate(text, &["mark", "label", "data"], LABEL_KEYWORD);
        assert_eq!(annotated.spans().len(), 2);
        assert_eq!(strip_markup(&annotated.render()), text);
    }

    #[test]
    fn test_round_trip_with_html_like_source() {
        let text = "<mark data-label=\"x\">python</mark> &amp; python &lt;3";
        let annotated = annotate(text, &["python", "mark"], LABEL_EMPHASIS);
        assert!(!annotated.spans().is_empty());
        assert_eq!(strip_markup(&annotated.render()), text);
    }

    #[test]
    fn test_round_trip_with_unicode_text() {
        let text = "Résumé: naïve Python, café—python";
        let annotated = annotate(text, &["python", "café"], LABEL_KEYWORD);
        assert_eq!(annotated.spans().len(), 3);
        assert_eq!(strip_markup(&annotated.render()), text);
    }

    #[test]
    fn test_punctuated_phrase_matches_as_whole_word() {
        assert_eq!(find_whole_word("C++ and c++17", "c++"), vec![(0, 3)]);
        assert_eq!(find_whole_word("node.js, nodejs", "node.js"), vec![(0, 7)]);
    }

    #[test]
    fn test_rejected_match_does_not_hide_later_bounded_match() {
        // First candidate "aa" at 0 is inside "aaa"; the bounded one is later.
        assert_eq!(find_whole_word("aaa aa", "aa"), vec![(4, 6)]);
    }

    #[test]
    fn test_phrase_is_searched_as_declared() {
        // Trailing space is part of the phrase and the word after it is fine.
        assert_eq!(find_whole_word("Worked as a developer", "Worked as a "), vec![(0, 12)]);
        assert!(find_whole_word("Worked as a", "Worked as a ").is_empty());
        // Leading space is kept too.
        assert_eq!(find_whole_word("big data", " data"), vec![(3, 8)]);
    }

    #[test]
    fn test_many_spans_resolve_quickly() {
        let text = "data ".repeat(100_000);
        let started = std::time::Instant::now();
        let annotated = annotate(&text, &["data"], LABEL_KEYWORD);
        assert_eq!(annotated.spans().len(), 100_000);
        assert_eq!(annotated.spans()[99_999].start, 499_995);
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }

    #[test]
    fn test_merge_checks_neighbours_on_both_sides() {
        let merged = merge_spans(vec![
            AnnotationSpan::rewrite(10, 14, LABEL_REWRITE, "x"),
            AnnotationSpan::rewrite(2, 4, LABEL_REWRITE, "y"),
            AnnotationSpan::highlight(3, 11, LABEL_EMPHASIS),
            AnnotationSpan::highlight(12, 20, LABEL_EMPHASIS),
            AnnotationSpan::highlight(5, 9, LABEL_EMPHASIS),
        ]);
        let ranges: Vec<(usize, usize)> = merged.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(ranges, vec![(2, 4), (5, 9), (10, 14)]);
    }

    #[test]
    fn test_blank_phrase_matches_nothing() {
        assert!(find_whole_word("anything", "  ").is_empty());
        assert!(find_whole_word("", "rust").is_empty());
    }

    #[test]
    fn test_merge_prefers_content_altering_spans() {
        let merged = merge_spans(vec![
            AnnotationSpan::highlight(0, 10, LABEL_EMPHASIS),
            AnnotationSpan::rewrite(4, 8, LABEL_REWRITE, "led"),
            AnnotationSpan::highlight(12, 15, LABEL_EMPHASIS),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].label, LABEL_REWRITE);
        assert_eq!(merged[1].start, 12);
    }

    #[test]
    fn test_merge_ties_keep_input_order() {
        let merged = merge_spans(vec![
            AnnotationSpan::rewrite(0, 3, LABEL_REWRITE, "first"),
            AnnotationSpan::rewrite(0, 3, LABEL_REWRITE, "second"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].replacement.as_deref(), Some("first"));
    }

    #[test]
    fn test_adjacent_spans_both_survive() {
        let merged = merge_spans(vec![
            AnnotationSpan::highlight(0, 4, LABEL_KEYWORD),
            AnnotationSpan::highlight(4, 8, LABEL_KEYWORD),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_invalid_spans_are_discarded() {
        let annotated = AnnotatedText::new(
            "é rust",
            vec![
                AnnotationSpan::highlight(1, 3, LABEL_KEYWORD), // splits 'é'
                AnnotationSpan::highlight(3, 99, LABEL_KEYWORD),
                AnnotationSpan::highlight(3, 7, LABEL_KEYWORD),
            ],
        );
        assert_eq!(annotated.spans().len(), 1);
        assert_eq!(annotated.plain_text(), "é rust");
    }

    #[test]
    fn test_replacement_spans_render_replacement_text() {
        let annotated = AnnotatedText::new(
            "Helped ship it",
            vec![AnnotationSpan::rewrite(0, 6, LABEL_REWRITE, "assisted")],
        );
        assert_eq!(annotated.plain_text(), "assisted ship it");
        assert_eq!(
            annotated.render(),
            "<mark data-label=\"rewrite\">assisted</mark> ship it"
        );
        assert_eq!(strip_markup(&annotated.render()), annotated.plain_text());
    }

    #[test]
    fn test_label_is_escaped_in_marker() {
        let annotated = annotate("rust", &["rust"], "a\"b<c");
        let rendered = annotated.render();
        assert!(rendered.starts_with("<mark data-label=\"a&quot;b&lt;c\">"));
        assert_eq!(strip_markup(&rendered), "rust");
    }

    #[test]
    fn test_serialized_view_has_rendered_and_plain() {
        let annotated = annotate("Rust dev", &["rust"], LABEL_KEYWORD);
        let json = serde_json::to_value(&annotated).unwrap();
        assert_eq!(json["source"], "Rust dev");
        assert_eq!(json["plain"], "Rust dev");
        assert_eq!(json["spans"][0]["label"], "keyword");
        assert!(json["spans"][0].get("replacement").is_none());
        assert!(json["rendered"].as_str().unwrap().contains("<mark"));
    }
}
