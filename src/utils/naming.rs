// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Property name normalization and lookup.
//!
//! Path expressions are written in camelCase (`userName`) while Rust fields
//! are snake_case (`user_name`). Lookups try the requested name first and
//! fall back to its snake_case rendering.

use std::borrow::Cow;

use convert_case::{Case, Casing};

/// Names to try, in order, when looking up `name`.
pub(crate) fn candidates(name: &str) -> impl Iterator<Item = Cow<'_, str>> {
    let snake = name.to_case(Case::Snake);
    let fallback = (snake != name).then_some(Cow::Owned(snake));
    std::iter::once(Cow::Borrowed(name)).chain(fallback)
}

/// First item whose key equals one of the [`candidates`] of `name`.
///
/// An exact match anywhere wins over a snake_case match.
pub(crate) fn find_by_name<'a, T>(
    items: &'a [T],
    name: &str,
    key: impl Fn(&T) -> &str
) -> Option<&'a T> {
    candidates(name).find_map(|candidate| items.iter().find(|item| key(item) == candidate))
}

/// Lower-case the first character.
pub(crate) fn uncapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new()
    }
}

/// Normalize one path segment: all-uppercase segments (`UUID`) are kept,
/// anything else is uncapitalized.
pub(crate) fn normalize_segment(segment: &str) -> String {
    let all_uppercase = segment
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '$'));
    if all_uppercase {
        segment.to_owned()
    } else {
        uncapitalize(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_add_snake_case() {
        let names: Vec<_> = candidates("userName").collect();
        assert_eq!(names, vec!["userName", "user_name"]);
    }

    #[test]
    fn candidates_skip_identical_snake_case() {
        let names: Vec<_> = candidates("user_name").collect();
        assert_eq!(names, vec!["user_name"]);
    }

    #[test]
    fn exact_match_wins() {
        let items = ["user_name", "userName"];
        assert_eq!(find_by_name(&items, "userName", |s| *s), Some(&"userName"));
        assert_eq!(find_by_name(&items[..1], "userName", |s| *s), Some(&"user_name"));
    }

    #[test]
    fn normalizes_segments() {
        assert_eq!(normalize_segment("Name"), "name");
        assert_eq!(normalize_segment("UUID"), "UUID");
        assert_eq!(normalize_segment("userName"), "userName");
        assert_eq!(normalize_segment(""), "");
    }
}
