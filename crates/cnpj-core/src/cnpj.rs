//! CNPJ Identifier Codec
//!
//! Shape normalization, checksum validation and display formatting for the
//! 14-digit Brazilian company tax identifier.
//!
//! # Layout
//!
//! ```text
//! 54 550 752 / 0001 - 55
//! └─ root ─┘   order  check
//! ```
//!
//! - **root** (8 digits): the economic entity
//! - **order** (4 digits): the establishment, `0001` is headquarters
//! - **check** (2 digits): two-pass mod-11 checksum over the preceding digits
//!
//! Every function except [`ensure_valid`] and [`Cnpj::parse`] is total: bad
//! input yields an empty or best-effort value, never an error.
//!
//! # Example
//!
//! ```rust
//! use cnpj_core::cnpj;
//!
//! assert_eq!(cnpj::normalize("54.550.752/0001-55"), "54550752000155");
//! assert!(cnpj::is_valid_checksum("54550752000155"));
//! assert_eq!(cnpj::format("54550752000155"), "54.550.752/0001-55");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of digits in a normalized identifier.
pub const CNPJ_LEN: usize = 14;

/// Digits covered by the checksum (root + order).
const BODY_LEN: usize = 12;

const ROOT: std::ops::Range<usize> = 0..8;
const ORDER: std::ops::Range<usize> = 8..12;
const CHECK: std::ops::Range<usize> = 12..14;

/// Keep only ASCII digits.
pub fn digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize an identifier to its digit-only form.
///
/// Non-digits are stripped. Shorter results are left-padded with `0` up to
/// 14 digits; longer ones pass through untouched. Input without any digit
/// normalizes to the empty string.
///
/// Padding makes a truncated identifier look structurally valid, so callers
/// that care must still check [`is_valid_checksum`].
pub fn normalize(input: &str) -> String {
    let d = digits(input);
    if d.is_empty() || d.len() >= CNPJ_LEN {
        return d;
    }
    format!("{:0>width$}", d, width = CNPJ_LEN)
}

/// True when the input carries no digits or only zeros.
pub fn is_empty_like(input: &str) -> bool {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .all(|c| c == '0')
}

/// Compute the two check digits for a 12-digit body.
///
/// Returns `None` unless `body` is exactly 12 ASCII digits.
pub fn check_digits(body: &str) -> Option<(u8, u8)> {
    if body.len() != BODY_LEN || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut values: Vec<u8> = body.bytes().map(|b| b - b'0').collect();
    let first = mod11_digit(&values, 5);
    values.push(first);
    let second = mod11_digit(&values, 6);

    Some((first, second))
}

/// Weighted mod-11 digit. Weights descend from `start` and wrap back to 9
/// whenever they would drop below 2.
fn mod11_digit(values: &[u8], start: u32) -> u8 {
    let mut weight = start;
    let mut sum = 0u32;
    for &v in values {
        sum += v as u32 * weight;
        weight -= 1;
        if weight < 2 {
            weight = 9;
        }
    }

    match sum % 11 {
        r if r < 2 => 0,
        r => (11 - r) as u8,
    }
}

/// Validate the checksum of an identifier (normalized first).
///
/// Rejects anything that is not exactly 14 digits after normalization and
/// degenerate sequences where every digit is the same.
pub fn is_valid_checksum(id: &str) -> bool {
    let id = normalize(id);
    if id.len() != CNPJ_LEN {
        return false;
    }

    let bytes = id.as_bytes();
    if bytes.iter().all(|&b| b == bytes[0]) {
        return false;
    }

    match check_digits(&id[..BODY_LEN]) {
        Some((first, second)) => {
            bytes[12] - b'0' == first && bytes[13] - b'0' == second
        }
        None => false,
    }
}

/// Alias for [`is_valid_checksum`].
pub fn is_valid(input: &str) -> bool {
    is_valid_checksum(input)
}

/// Normalize and validate, failing with [`Error::InvalidIdentifier`].
pub fn ensure_valid(input: &str) -> Result<String> {
    let id = normalize(input);
    if !is_valid_checksum(&id) {
        return Err(Error::InvalidIdentifier(id));
    }
    Ok(id)
}

/// Render as `NN.NNN.NNN/NNNN-NN`, or an empty string when the normalized
/// form is not exactly 14 digits.
pub fn format(id: &str) -> String {
    let id = normalize(id);
    if id.len() != CNPJ_LEN {
        return String::new();
    }
    format!(
        "{}.{}.{}/{}-{}",
        &id[0..2],
        &id[2..5],
        &id[5..8],
        &id[8..12],
        &id[12..14]
    )
}

fn segment(id: &str, range: std::ops::Range<usize>) -> Option<&str> {
    if id.len() == CNPJ_LEN && id.bytes().all(|b| b.is_ascii_digit()) {
        Some(&id[range])
    } else {
        None
    }
}

/// Root segment (first 8 digits) of a normalized identifier.
pub fn root_segment(id: &str) -> Option<&str> {
    segment(id, ROOT)
}

/// Order segment (digits 9-12) of a normalized identifier.
pub fn order_segment(id: &str) -> Option<&str> {
    segment(id, ORDER)
}

/// Check segment (last 2 digits) of a normalized identifier.
pub fn check_segment(id: &str) -> Option<&str> {
    segment(id, CHECK)
}

/// A checksum-valid CNPJ.
///
/// Holds the 14-digit normalized form. Displays formatted and serializes as
/// the bare digit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cnpj(String);

impl Cnpj {
    /// Parse any punctuation variant of a valid identifier.
    pub fn parse(input: &str) -> Result<Self> {
        ensure_valid(input).map(Self)
    }

    /// The 14-digit form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `NN.NNN.NNN/NNNN-NN` form.
    pub fn formatted(&self) -> String {
        format(&self.0)
    }

    pub fn root(&self) -> &str {
        &self.0[ROOT]
    }

    pub fn order(&self) -> &str {
        &self.0[ORDER]
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl FromStr for Cnpj {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Cnpj {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Cnpj> for String {
    fn from(value: Cnpj) -> Self {
        value.0
    }
}

impl AsRef<str> for Cnpj {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pads_short_input() {
        assert_eq!(normalize("123456789012"), "00123456789012");
        assert_eq!(normalize("12345678901234"), "12345678901234");
        assert_eq!(normalize("54.550.752/0001-55"), "54550752000155");
    }

    #[test]
    fn test_normalize_keeps_long_input() {
        assert_eq!(normalize("1234567890123456"), "1234567890123456");
    }

    #[test]
    fn test_normalize_without_digits_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("n/a"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for input in ["", "1", "12.345", "54.550.752/0001-55", "99999999999999999", "abc 7"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_empty_like() {
        assert!(is_empty_like(""));
        assert!(is_empty_like("000.000.000/0000-00"));
        assert!(is_empty_like("--"));
        assert!(!is_empty_like("54.550.752/0001-55"));
    }

    #[test]
    fn test_check_digits() {
        assert_eq!(check_digits("545507520001"), Some((5, 5)));
        assert_eq!(check_digits("123456789012"), Some((3, 0)));
        assert_eq!(check_digits("12345"), None);
        assert_eq!(check_digits("12345678901a"), None);
    }

    #[test]
    fn test_checksum() {
        assert!(is_valid_checksum("54550752000155"));
        assert!(is_valid_checksum("54.550.752/0001-55"));
        assert!(!is_valid_checksum("11111111111111"));
        assert!(!is_valid_checksum("00000000000000"));
        assert!(!is_valid_checksum("12345678901235"));
        assert!(is_valid_checksum("12345678901230"));
        assert!(!is_valid_checksum(""));
        assert!(!is_valid_checksum("545507520001555"));
    }

    #[test]
    fn test_ensure_valid() {
        assert_eq!(ensure_valid("54.550.752/0001-55").unwrap(), "54550752000155");
        assert_eq!(
            ensure_valid("12.345.678/9012-35"),
            Err(Error::InvalidIdentifier("12345678901235".into()))
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(format("54550752000155"), "54.550.752/0001-55");
        assert_eq!(format("4550752000155"), "04.550.752/0001-55");
        assert_eq!(format(""), "");
        assert_eq!(format("1234567890123456"), "");
    }

    #[test]
    fn test_segments() {
        assert_eq!(root_segment("54550752000155"), Some("54550752"));
        assert_eq!(order_segment("54550752000155"), Some("0001"));
        assert_eq!(check_segment("54550752000155"), Some("55"));
        assert_eq!(order_segment("5455"), None);
    }

    #[test]
    fn test_cnpj_newtype() {
        let id: Cnpj = "54.550.752/0001-55".parse().unwrap();
        assert_eq!(id.as_str(), "54550752000155");
        assert_eq!(id.to_string(), "54.550.752/0001-55");
        assert_eq!(id.root(), "54550752");
        assert_eq!(id.order(), "0001");
        assert!(Cnpj::parse("11111111111111").is_err());
    }

    #[test]
    fn test_cnpj_serde() {
        let id = Cnpj::parse("54550752000155").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"54550752000155\"");

        let back: Cnpj = serde_json::from_str("\"54.550.752/0001-55\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<Cnpj>("\"12345678901235\"").is_err());
    }
}
