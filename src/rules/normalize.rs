//! Text normalization ahead of extraction.
//!
//! Sign text arrives from several upstream feeds with inconsistent casing,
//! punctuation, and clock spellings. Every extraction regex in this crate is
//! written against the canonical form produced here:
//!
//! - ASCII uppercase only; anything else becomes a space.
//! - Kept punctuation: `:` (clock minutes), `-` (ranges), `,` and `&` (lists).
//! - `A.M.`/`P.M.` -> `AM`/`PM`, glued to the preceding digit (`8 AM` -> `8AM`).
//! - `NOON` -> `12PM`, `MIDNIGHT` -> `12AM`.
//! - En/em dashes and minus signs -> `-`, with no spaces around it.
//! - Runs of whitespace collapsed to one space, trimmed.

/// Produce the canonical uppercase form of a regulation string.
pub(crate) fn normalize(text: &str) -> String {
    let upper = text.to_uppercase();
    let upper = regex!(r"(\d|\b)([AP])\.\s?M\b\.?").replace_all(&upper, "${1}${2}M");

    let cleaned: String = upper
        .chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            'A'..='Z' | '0'..='9' | ':' | '-' | ',' | '&' => c,
            _ => ' ',
        })
        .collect();

    let cleaned = regex!(r"\bNOON\b").replace_all(&cleaned, "12PM");
    let cleaned = regex!(r"\bMIDNIGHT\b").replace_all(&cleaned, "12AM");
    let cleaned = regex!(r"(\d)\s+(AM|PM)\b").replace_all(&cleaned, "${1}${2}");
    let cleaned = regex!(r"\s*-\s*").replace_all(&cleaned, "-");
    let cleaned = regex!(r"\s*,\s*").replace_all(&cleaned, ", ");

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
