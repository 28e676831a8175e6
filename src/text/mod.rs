//! Farsi text normalization.
//!
//! Catalog exports mix Arabic and Persian letter forms, Arabic-Indic and
//! Persian digits, zero-width joiners and stray punctuation. [`normalize`]
//! maps all of these onto one canonical form so that day names, titles and
//! teacher names compare equal across dialects.

use once_cell::sync::Lazy;
use regex::Regex;

/// Substitution table, applied in order. Kasra-carrying letter pairs come
/// before the bare-letter rules so the diacritic is dropped with its letter.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("أ", "ا"),
    ("ة", "ه"),
    ("ك", "ک"),
    ("د\u{650}", "د"),
    ("ب\u{650}", "ب"),
    ("ز\u{650}", "ز"),
    ("ذ\u{650}", "ذ"),
    ("ش\u{650}", "ش"),
    ("س\u{650}", "س"),
    ("ى", "ی"),
    ("ي", "ی"),
    ("٠", "۰"),
    ("١", "۱"),
    ("٢", "۲"),
    ("٣", "۳"),
    ("٤", "۴"),
    ("٥", "۵"),
    ("٦", "۶"),
    ("٧", "۷"),
    ("٨", "۸"),
    ("٩", "۹"),
    ("(", " "),
    (")", " "),
    ("-", " "),
    ("ئ", "ی"),
    ("\u{200c}", " "),
    ("\u{200f}", " "),
];

static MULTI_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Canonicalize character variants, collapse runs of whitespace to a single
/// space and trim.
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(input: &str) -> String {
    let mut s = input.to_string();
    for (from, to) in SUBSTITUTIONS {
        if s.contains(from) {
            s = s.replace(from, to);
        }
    }
    MULTI_WHITESPACE.replace_all(&s, " ").trim().to_string()
}
