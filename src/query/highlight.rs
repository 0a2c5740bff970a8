//! Highlight snippet extraction

use crate::models::Document;
use std::collections::HashMap;

/// Build highlight snippets for the title, body, and description fields.
///
/// A word matches when its lowercase form contains any query token. Each
/// snippet is the matched word with `window` words of context on either side,
/// matched words wrapped in `<mark>` tags, capped at `max_snippets` per field.
pub fn highlight_document(
    doc: &Document,
    tokens: &[String],
    window: usize,
    max_snippets: usize,
) -> HashMap<String, Vec<String>> {
    let mut highlights = HashMap::new();

    let fields: [(&str, Option<&String>); 3] = [
        ("title", doc.title.as_ref()),
        ("body", doc.body.as_ref()),
        ("description", doc.description.as_ref()),
    ];

    for (name, value) in fields {
        if let Some(text) = value {
            let snippets = snippets_for(text, tokens, window, max_snippets);
            if !snippets.is_empty() {
                highlights.insert(name.to_string(), snippets);
            }
        }
    }

    highlights
}

fn word_matches(word: &str, tokens: &[String]) -> bool {
    let lowered = word.to_lowercase();
    tokens.iter().any(|token| lowered.contains(token.as_str()))
}

fn snippets_for(text: &str, tokens: &[String], window: usize, max_snippets: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut snippets = Vec::new();
    // end (exclusive) of the last emitted window, so overlapping matches
    // collapse into one snippet
    let mut covered_until = 0usize;

    for (i, word) in words.iter().enumerate() {
        if snippets.len() >= max_snippets {
            break;
        }
        if i < covered_until || !word_matches(word, tokens) {
            continue;
        }

        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(words.len());
        let rendered: Vec<String> = words[start..end]
            .iter()
            .map(|w| {
                if word_matches(w, tokens) {
                    format!("<mark>{}</mark>", w)
                } else {
                    (*w).to_string()
                }
            })
            .collect();

        snippets.push(rendered.join(" "));
        covered_until = end;
    }

    snippets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_window_and_marking() {
        let text = "one two three four five target six seven eight nine ten";
        let snippets = snippets_for(text, &tokens(&["target"]), 2, 3);

        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0], "four five <mark>target</mark> six seven");
    }

    #[test]
    fn test_snippet_cap() {
        let text = "match a a a a a a a a a a match a a a a a a a a a a match \
                    a a a a a a a a a a match";
        let snippets = snippets_for(text, &tokens(&["match"]), 1, 3);
        assert_eq!(snippets.len(), 3);
    }

    #[test]
    fn test_overlapping_matches_collapse() {
        let text = "alpha beta alpha";
        let snippets = snippets_for(text, &tokens(&["alpha"]), 5, 3);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0], "<mark>alpha</mark> beta <mark>alpha</mark>");
    }

    #[test]
    fn test_case_insensitive_containment() {
        let text = "The Quarterly-Report arrived";
        let snippets = snippets_for(text, &tokens(&["report"]), 1, 3);
        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].contains("<mark>Quarterly-Report</mark>"));
    }

    #[test]
    fn test_no_match_no_field_entry() {
        let doc_fields = snippets_for("nothing here", &tokens(&["absent"]), 5, 3);
        assert!(doc_fields.is_empty());
    }
}
