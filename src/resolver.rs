//! Fuzzy group-code resolver
//!
//! Matches a spoken-to-text utterance against the catalog of valid
//! group codes (shaped like `ИКБО-01-20`). Deliberately forgiving:
//! speech recognition drops hyphens and inserts stray spaces, so the
//! matcher anchors on the two-digit group number when one is present
//! and falls back to a similarity ratio otherwise.

use regex::Regex;
use std::sync::OnceLock;

fn letter_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("[а-яА-Яa-zA-Z]{5,}").expect("letter-run pattern"))
}

/// Best-matching catalog entry for the utterance, or `None` when the
/// input does not look like a group code at all.
pub fn resolve_group<'a>(utterance: &str, catalog: &'a [String]) -> Option<&'a str> {
    let len = utterance.chars().count();
    if !(5..=10).contains(&len) {
        return None;
    }
    // A run of five or more letters means ordinary words, not a code.
    if letter_run().is_match(utterance) {
        return None;
    }

    let stripped: Vec<char> = utterance.chars().filter(|c| *c != ' ').collect();
    let digit_pos = stripped
        .windows(2)
        .position(|w| w[0].is_ascii_digit() && w[1].is_ascii_digit());

    match digit_pos {
        Some(pos) => match_by_number(&stripped, pos, catalog),
        None => match_by_similarity(&stripped, catalog),
    }
}

/// Digit-anchored path: the two-digit group number splits the input
/// into department prefix, number and optional year suffix.
fn match_by_number<'a>(stripped: &[char], pos: usize, catalog: &'a [String]) -> Option<&'a str> {
    let prefix: String = stripped[..pos.saturating_sub(1)]
        .iter()
        .collect::<String>()
        .to_lowercase();
    let number: String = stripped[pos..pos + 2].iter().collect();
    let year: String = stripped[pos + 2..]
        .iter()
        .filter(|c| c.is_ascii_digit())
        .collect();

    for entry in catalog {
        let head: String = entry.chars().take(7).collect();
        if !entry.to_lowercase().contains(&prefix) || !head.contains(&number) {
            continue;
        }
        let tail: String = entry.chars().skip(8).collect();
        match year.chars().count() {
            0 => return Some(entry),
            1 if tail.chars().next() == year.chars().next() => return Some(entry),
            2 if tail == year => return Some(entry),
            _ => {}
        }
    }
    None
}

/// Lexical fallback: highest normalized similarity ratio wins, first
/// catalog entry on ties.
fn match_by_similarity<'a>(stripped: &[char], catalog: &'a [String]) -> Option<&'a str> {
    let lowered = stripped.iter().collect::<String>().to_lowercase();
    let mut best: Option<(&'a str, f32)> = None;
    for entry in catalog {
        let ratio = similar::TextDiff::from_chars(lowered.as_str(), entry.to_lowercase().as_str())
            .ratio();
        if best.is_none_or(|(_, b)| ratio > b) {
            best = Some((entry, ratio));
        }
    }
    best.map(|(entry, _)| entry)
}
