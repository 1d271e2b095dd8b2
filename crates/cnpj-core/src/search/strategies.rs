//! Scoring signals
//!
//! Each signal is independent and contributes its weight when it fires;
//! the engine sums them. The exact-identifier signal is the exception: it
//! short-circuits every other one.

use crate::cnpj::CNPJ_LEN;

/// A fired signal and its contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyMatch {
    pub score: u32,
    pub strategy: &'static str,
}

/// Query digits equal the record's normalized CNPJ
#[inline]
pub fn exact_id_match(query_digits: &str, record_id: &str, weight: u32) -> Option<StrategyMatch> {
    if query_digits.len() == CNPJ_LEN && record_id == query_digits {
        Some(StrategyMatch {
            score: weight,
            strategy: "exact_id",
        })
    } else {
        None
    }
}

/// Name starts with the whole query
#[inline]
pub fn prefix_match(query: &str, name: &str, weight: u32) -> Option<StrategyMatch> {
    if !query.is_empty() && name.starts_with(query) {
        Some(StrategyMatch {
            score: weight,
            strategy: "prefix",
        })
    } else {
        None
    }
}

/// Every query token appears somewhere in the name
#[inline]
pub fn all_tokens_match(query_tokens: &[&str], name: &str, weight: u32) -> Option<StrategyMatch> {
    if !query_tokens.is_empty() && query_tokens.iter().all(|t| name.contains(t)) {
        Some(StrategyMatch {
            score: weight,
            strategy: "all_tokens",
        })
    } else {
        None
    }
}

/// Long enough run of query digits inside the record's CNPJ digits
#[inline]
pub fn digits_substring_match(
    query_digits: &str,
    record_digits: &str,
    min_len: usize,
    weight: u32,
) -> Option<StrategyMatch> {
    if query_digits.len() >= min_len
        && !query_digits.is_empty()
        && record_digits.contains(query_digits)
    {
        Some(StrategyMatch {
            score: weight,
            strategy: "digits",
        })
    } else {
        None
    }
}
