//! Token substitution for header filters.
//!
//! A filter is free text containing `$name$` tokens. Each token may carry
//! decoration: separators and opening brackets directly before it
//! (`, `, ` `, `(`, `[`, `{`) and closing brackets directly after it
//! (`)`, `]`, `}`). When a token's value is empty the token is removed
//! together with its decoration, so `"$tracks$, $discs$ [$disc_ratio$]"`
//! collapses to `"13 tracks"` instead of leaving `", []"` behind.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::trace;

/// Token names understood by the album header, in substitution order.
pub const DEFAULT_TOKENS: [&str; 5] =
    ["release_date", "tracks", "discs", "disc_ratio", "length"];

// Anything shaped like a token, known or not. Only used for linting.
#[allow(clippy::expect_used)]
static TOKEN_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)\$").expect("constant regex pattern is valid")
});

/// Renders filters against a fixed, ordered token vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEngine {
    tokens: Vec<String>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TOKENS)
    }
}

impl TemplateEngine {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Tokens whose `$name$` form occurs in `template`, in vocabulary order.
    pub fn found_tokens(&self, template: &str) -> Vec<&str> {
        found_tokens(template, &self.tokens)
    }

    pub fn render(&self, template: &str, values: &HashMap<String, String>) -> String {
        render(template, &self.tokens, values)
    }

    /// `$name$` substrings whose name is outside the vocabulary, first
    /// appearance order, without duplicates.
    pub fn unknown_tokens(&self, template: &str) -> Vec<String> {
        let mut unknown: Vec<String> = Vec::new();
        for caps in TOKEN_LIKE.captures_iter(template) {
            let name = &caps[1];
            if self.tokens.iter().any(|t| t == name) || unknown.iter().any(|u| u == name) {
                continue;
            }
            unknown.push(name.to_string());
        }
        unknown
    }
}

/// A rendered fragment. Text borrows from the template, values from the
/// value map; only text is scanned for further tokens.
#[derive(Debug, Clone, Copy)]
enum Piece<'a> {
    Text(&'a str),
    Value(&'a str),
}

fn is_opening(c: char) -> bool {
    matches!(c, ',' | ' ' | '(' | '[' | '{')
}

fn is_closing(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

fn delimited(name: &str) -> String {
    format!("${}$", name)
}

fn found_tokens<'t, S: AsRef<str>>(template: &str, tokens: &'t [S]) -> Vec<&'t str> {
    let mut found: Vec<&str> = Vec::new();
    for name in tokens.iter().map(AsRef::as_ref) {
        if name.is_empty() || found.contains(&name) {
            continue;
        }
        if template.contains(&delimited(name)) {
            found.push(name);
        }
    }
    found
}

/// Substitute every token of `tokens` found in `template` with its value.
///
/// Tokens are processed in `tokens` order, each pass over the output of the
/// previous one. Tokens without an entry in `values` are left as written;
/// inserted values are never scanned again.
pub fn render<S: AsRef<str>>(
    template: &str,
    tokens: &[S],
    values: &HashMap<String, String>,
) -> String {
    let found = found_tokens(template, tokens);
    if found.is_empty() {
        return template.to_string();
    }
    trace!(tokens = ?found, "rendering filter");

    let mut pieces = vec![Piece::Text(template)];
    for name in found {
        let Some(value) = values.get(name) else {
            trace!(token = name, "no value bound, leaving token in place");
            continue;
        };
        let needle = delimited(name);
        let mut next = Vec::with_capacity(pieces.len() + 2);
        for piece in pieces {
            match piece {
                Piece::Text(text) => substitute(text, &needle, value, &mut next),
                Piece::Value(_) => next.push(piece),
            }
        }
        pieces = next;
    }

    let mut out = String::with_capacity(template.len());
    for piece in pieces {
        match piece {
            Piece::Text(s) | Piece::Value(s) => out.push_str(s),
        }
    }
    out
}

/// One pass of a single token over one text fragment.
fn substitute<'a>(text: &'a str, needle: &str, value: &'a str, out: &mut Vec<Piece<'a>>) {
    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find(needle) {
        let start = cursor + offset;
        let end = start + needle.len();
        let after = &text[end..];
        // decoration characters are ASCII, so byte arithmetic stays on char boundaries
        let close_end = end + (after.len() - after.trim_start_matches(is_closing).len());

        if value.is_empty() {
            push_text(out, text[cursor..start].trim_end_matches(is_opening));
        } else {
            push_text(out, &text[cursor..start]);
            out.push(Piece::Value(value));
            push_text(out, &text[end..close_end]);
        }
        cursor = close_end;
    }
    push_text(out, &text[cursor..]);
}

fn push_text<'a>(out: &mut Vec<Piece<'a>>, text: &'a str) {
    if !text.is_empty() {
        out.push(Piece::Text(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn release_date_only() {
        let engine = TemplateEngine::default();
        let v = values(&[("release_date", "Monday, August 14, 2000")]);
        assert_eq!(engine.render("$release_date$", &v), "Monday, August 14, 2000");
    }

    #[test]
    fn all_values_present_keep_decoration() {
        let engine = TemplateEngine::default();
        let v = values(&[("tracks", "13 tracks"), ("discs", "3 discs"), ("disc_ratio", "5/4/4")]);
        assert_eq!(
            engine.render("$tracks$, $discs$ [$disc_ratio$]", &v),
            "13 tracks, 3 discs [5/4/4]"
        );
    }

    #[test]
    fn empty_values_take_their_decoration_with_them() {
        let engine = TemplateEngine::default();
        let v = values(&[("tracks", "1 track"), ("discs", ""), ("disc_ratio", "")]);
        assert_eq!(engine.render("$tracks$, $discs$ [$disc_ratio$]", &v), "1 track");
    }

    #[test]
    fn elision_leaves_neighbouring_brackets_alone() {
        let engine = TemplateEngine::new(["t"]);
        assert_eq!(engine.render("A, $t$ (x)", &values(&[("t", "")])), "A (x)");
    }

    #[test]
    fn missing_value_leaves_token_text() {
        let engine = TemplateEngine::default();
        let v = values(&[("tracks", "2 tracks")]);
        assert_eq!(engine.render("$tracks$ / $length$", &v), "2 tracks / $length$");
    }

    #[test]
    fn values_are_not_rescanned() {
        let engine = TemplateEngine::default();
        let v = values(&[("tracks", "$discs$"), ("discs", "3 discs")]);
        assert_eq!(engine.render("$tracks$", &v), "$discs$");
    }

    #[test]
    fn unknown_tokens_are_reported_once() {
        let engine = TemplateEngine::default();
        let found = engine.unknown_tokens("$tracks$ $label$ ($label$) $Tracks$");
        assert_eq!(found, vec!["label".to_string(), "Tracks".to_string()]);
    }

    #[test]
    fn found_tokens_follow_vocabulary_order() {
        let engine = TemplateEngine::default();
        assert_eq!(
            engine.found_tokens("$length$ $tracks$ $tracks$"),
            vec!["tracks", "length"]
        );
    }
}
