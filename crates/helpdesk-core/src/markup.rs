// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram HTML helpers.
//!
//! Outbound messages that carry [`TextFormat::Html`](crate::types::TextFormat)
//! use the small tag subset Telegram understands. User-provided values must be
//! escaped before they are interpolated, and the same markup must be removable
//! for plain-text destinations (email bodies, parse-mode fallback).

/// Escapes `&`, `<`, `>` and `"` for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Removes tags and decodes the entities produced by [`escape_html`].
///
/// An unterminated `<` is kept verbatim.
pub fn strip_html(markup: &str) -> String {
    let mut result = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(start) = rest.find('<') {
        result.push_str(&rest[..start]);
        match rest[start..].find('>') {
            Some(end) => rest = &rest[start + end + 1..],
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);

    unescape_entities(&result)
}

fn unescape_entities(text: &str) -> String {
    // `&amp;` last so `&amp;lt;` decodes to `&lt;`, not `<`.
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}
