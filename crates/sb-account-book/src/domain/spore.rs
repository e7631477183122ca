//! # Spore Tier
//!
//! A spore's tier is embedded in its UTF-8 content as the last pair of
//! adjacent hex digits, e.g. `"...level:0a"` is tier 10.

use crate::errors::AccountBookError;

/// Derive the tier from spore content.
pub fn tier_from_content(content: &[u8]) -> Result<u8, AccountBookError> {
    let text = std::str::from_utf8(content)
        .map_err(|_| AccountBookError::eligibility("spore content is not utf-8"))?;

    text.as_bytes()
        .windows(2)
        .rev()
        .find_map(|pair| Some((hex_digit(pair[0])? << 4) | hex_digit(pair[1])?))
        .ok_or_else(|| AccountBookError::eligibility("spore content carries no tier"))
}

fn hex_digit(c: u8) -> Option<u8> {
    char::from(c).to_digit(16).and_then(|d| u8::try_from(d).ok())
}
