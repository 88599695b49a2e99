use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_derive::Serialize;
use unicode_normalization::UnicodeNormalization;

/// Canonical district code, `D` followed by a zero-padded number (`D08`).
///
/// Only constructed through [`normalize_district_code`], so comparing two
/// codes never has to care about the raw label format.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DistrictCode(String);

impl DistrictCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // "D-08" style codes are shown with a space in the selector
    pub fn display_label(&self) -> String {
        self.0.replace('-', " ")
    }
}

impl fmt::Display for DistrictCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// raw labels are accepted wherever a code is deserialized
impl<'de> Deserialize<'de> for DistrictCode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(normalize_district_code(&s))
    }
}

impl From<&str> for DistrictCode {
    fn from(s: &str) -> Self {
        normalize_district_code(s)
    }
}

/// "Distrito 8", "8", "d8" and "D08" all become `D08`.
///
/// Takes the first run of ASCII digits. Inputs without digits are returned
/// uppercased, empty input gives an empty code.
pub fn normalize_district_code(input: &str) -> DistrictCode {
    if input.is_empty() {
        return DistrictCode::default();
    }

    let digits = input
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>();

    if digits.is_empty() {
        return DistrictCode(input.to_uppercase());
    }

    let number = digits.trim_start_matches('0');
    let number = if number.is_empty() { "0" } else { number };
    DistrictCode(format!("D{number:0>2}"))
}

/// Lowercased, trimmed, without combining diacritics: "  Ñuñoa " -> "nunoa".
pub fn comparison_key(text: &str) -> String {
    text.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// URL-safe identifier for records that ship without a `slug`.
pub fn create_slug(nombre: &str, distrito: &str) -> String {
    let base = format!("{nombre}-{distrito}").to_lowercase();
    let base = comparison_key(&base);

    let kept = base
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == ' ')
        .collect::<String>();

    let mut slug = String::with_capacity(kept.len());
    for c in kept.split_whitespace().collect::<Vec<_>>().join("-").chars() {
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug
}
