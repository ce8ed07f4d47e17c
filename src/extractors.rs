//! Country and script extractors.
//!
//! Each extractor pulls one normalized signal out of a raw field and returns
//! `None` (or [`NamePattern::Unknown`]) when nothing can be inferred. Lookups
//! are driven by the static, ordered tables below; earlier entries win.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::NamePattern;

/// International calling code → country, checked in order.
pub const PHONE_PREFIXES: [(&str, &str); 15] = [
    ("+33", "FR"),
    ("+1", "US"),
    ("+44", "UK"),
    ("+49", "DE"),
    ("+34", "ES"),
    ("+39", "IT"),
    ("+98", "IR"),
    ("+86", "CN"),
    ("+81", "JP"),
    ("+91", "IN"),
    ("+7", "RU"),
    ("+55", "BR"),
    ("+52", "MX"),
    ("+61", "AU"),
    ("+82", "KR"),
];

/// Country names and aliases → country, checked in order.
///
/// Matching is a case-insensitive substring search, so a name embedded in a
/// longer word also matches and multi-country text resolves to table order.
pub const LOCATION_NAMES: [(&str, &str); 17] = [
    ("Iran", "IR"),
    ("France", "FR"),
    ("USA", "US"),
    ("United States", "US"),
    ("Germany", "DE"),
    ("Spain", "ES"),
    ("Italy", "IT"),
    ("China", "CN"),
    ("Japan", "JP"),
    ("India", "IN"),
    ("Russia", "RU"),
    ("Brazil", "BR"),
    ("Mexico", "MX"),
    ("Australia", "AU"),
    ("South Korea", "KR"),
    ("UK", "UK"),
    ("United Kingdom", "UK"),
];

/// Share of classified characters a script needs to be dominant.
pub const SCRIPT_DOMINANCE: f64 = 0.7;

static PHONE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+(\d{1,3})").expect("phone prefix pattern is valid"));

/// Country code of an IBAN: its first two characters once whitespace is
/// stripped and the text upper-cased. No checksum is verified.
pub fn extract_iban_country(iban: Option<&str>) -> Option<String> {
    let cleaned: String = iban?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned.chars().take(2).collect())
}

/// Country of a phone number from its leading `+` calling code.
pub fn extract_phone_country(phone: Option<&str>) -> Option<&'static str> {
    let captures = PHONE_PREFIX_RE.captures(phone?)?;
    let prefix = format!("+{}", &captures[1]);

    PHONE_PREFIXES
        .iter()
        .find(|(code, _)| prefix.starts_with(code))
        .map(|(_, country)| *country)
}

/// Country named anywhere in a free-text location.
pub fn extract_location_country(location: Option<&str>) -> Option<&'static str> {
    let haystack = location?.to_uppercase();

    LOCATION_NAMES
        .iter()
        .find(|(name, _)| haystack.contains(&name.to_uppercase()))
        .map(|(_, country)| *country)
}

fn classify(c: char) -> Option<NamePattern> {
    match u32::from(c) {
        0x0041..=0x007A | 0x00C0..=0x024F => Some(NamePattern::Latin),
        0x0600..=0x06FF | 0x0750..=0x077F => Some(NamePattern::Arabic),
        0x0400..=0x04FF => Some(NamePattern::Cyrillic),
        0x4E00..=0x9FFF | 0x3040..=0x30FF => Some(NamePattern::Cjk),
        _ => None,
    }
}

/// Dominant script of `text`, in a single pass.
///
/// Characters outside the four tracked ranges are ignored. Returns
/// [`NamePattern::Unknown`] when nothing was classified and
/// [`NamePattern::Mixed`] when no script reaches [`SCRIPT_DOMINANCE`].
pub fn detect_unicode_script(text: &str) -> NamePattern {
    let mut counts = [
        (NamePattern::Latin, 0usize),
        (NamePattern::Arabic, 0),
        (NamePattern::Cyrillic, 0),
        (NamePattern::Cjk, 0),
    ];

    for script in text.chars().filter_map(classify) {
        if let Some(slot) = counts.iter_mut().find(|(s, _)| *s == script) {
            slot.1 += 1;
        }
    }

    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return NamePattern::Unknown;
    }

    let threshold = total as f64 * SCRIPT_DOMINANCE;
    counts
        .iter()
        .find(|(_, n)| *n as f64 >= threshold)
        .map(|(script, _)| *script)
        .unwrap_or(NamePattern::Mixed)
}
