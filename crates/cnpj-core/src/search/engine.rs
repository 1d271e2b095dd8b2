//! SearchEngine - scoring of company records against a query

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::rank;
use super::strategies;
use super::text::{normalize_text, tokens};
use crate::cnpj;
use crate::record::CompanyRecord;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Engine configuration
///
/// Defaults are the production weights; every field is optional when
/// deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub exact_id_score: u32,
    pub prefix_score: u32,
    pub all_tokens_score: u32,
    pub digits_substring_score: u32,
    pub min_digit_substring_len: usize,
    /// Below this many characters (and digits) a query returns nothing
    pub min_query_len: usize,
    pub max_results: usize,
    pub parallel_threshold: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exact_id_score: 1000,
            prefix_score: 800,
            all_tokens_score: 700,
            digits_substring_score: 500,
            min_digit_substring_len: 5,
            min_query_len: 2,
            max_results: 20,
            parallel_threshold: 1000,
        }
    }
}

/// Output projection of a ranked record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMatch {
    pub id: String,
    pub name: String,
    /// `NN.NNN.NNN/NNNN-NN`, empty when the record has no usable CNPJ
    pub cnpj: String,
    pub score: u32,
}

/// A record that scored above zero, with its ranking keys precomputed.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a, R> {
    pub record: &'a R,
    pub score: u32,
    /// Query digits equal this record's CNPJ
    pub exact_id: bool,
    /// Signals that fired, in evaluation order
    pub strategies: Vec<&'static str>,
    /// Normalized CNPJ, or the name when the record has none
    pub identity_key: String,
    pub name_len: usize,
    pub sort_name: String,
}

impl<'a, R: CompanyRecord> ScoredCandidate<'a, R> {
    pub fn to_match(&self) -> CompanyMatch {
        CompanyMatch {
            id: self.record.id().to_string(),
            name: self.record.name().to_string(),
            cnpj: self
                .record
                .tax_id()
                .filter(|id| !cnpj::is_empty_like(id))
                .map(cnpj::format)
                .unwrap_or_default(),
            score: self.score,
        }
    }
}

/// Query parsed once per search.
struct PreparedQuery<'q> {
    text: &'q str,
    tokens: Vec<&'q str>,
    digits: String,
}

/// Stateless search engine over borrowed record pools.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    /// Create a SearchEngine with default configuration
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Score, deduplicate, rank and project.
    ///
    /// Returns at most `max_results` entries and an empty list for queries
    /// too short to be meaningful.
    pub fn search<R: CompanyRecord>(&self, query: &str, pool: &[R]) -> Vec<CompanyMatch> {
        self.ranked(query, pool)
            .iter()
            .map(ScoredCandidate::to_match)
            .collect()
    }

    /// Same as [`search`](Self::search) but keeps borrowed records.
    pub fn ranked<'a, R: CompanyRecord>(
        &self,
        query: &str,
        pool: &'a [R],
    ) -> Vec<ScoredCandidate<'a, R>> {
        let trimmed = query.trim();
        let digits = cnpj::digits(trimmed);
        if trimmed.chars().count() < self.config.min_query_len
            && digits.len() < self.config.min_query_len
        {
            trace!(query_len = trimmed.len(), "query too short, skipping scan");
            return Vec::new();
        }

        let text = normalize_text(trimmed);
        let prepared = PreparedQuery {
            text: &text,
            tokens: tokens(&text).collect(),
            digits,
        };

        let scored = self.score_pool(&prepared, pool);
        debug!(
            pool = pool.len(),
            matched = scored.len(),
            "scored company pool"
        );

        let mut ranked = rank::dedup_best(scored);
        rank::sort_candidates(&mut ranked);
        ranked.truncate(self.config.max_results);
        ranked
    }

    /// Score against the pool - parallel on large pools when enabled
    #[cfg(feature = "parallel")]
    fn score_pool<'a, R: CompanyRecord>(
        &self,
        query: &PreparedQuery<'_>,
        pool: &'a [R],
    ) -> Vec<ScoredCandidate<'a, R>> {
        if pool.len() >= self.config.parallel_threshold {
            pool.par_iter()
                .filter_map(|record| self.score_record(query, record))
                .collect()
        } else {
            self.score_sequential(query, pool)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn score_pool<'a, R: CompanyRecord>(
        &self,
        query: &PreparedQuery<'_>,
        pool: &'a [R],
    ) -> Vec<ScoredCandidate<'a, R>> {
        self.score_sequential(query, pool)
    }

    fn score_sequential<'a, R: CompanyRecord>(
        &self,
        query: &PreparedQuery<'_>,
        pool: &'a [R],
    ) -> Vec<ScoredCandidate<'a, R>> {
        pool.iter()
            .filter_map(|record| self.score_record(query, record))
            .collect()
    }

    /// Score one record. `None` for unsearchable records and zero scores.
    fn score_record<'a, R: CompanyRecord>(
        &self,
        query: &PreparedQuery<'_>,
        record: &'a R,
    ) -> Option<ScoredCandidate<'a, R>> {
        if !record.is_searchable() {
            return None;
        }

        let raw_id = record.tax_id().unwrap_or_default();
        let normalized_id = cnpj::normalize(raw_id);
        let sort_name = normalize_text(record.name());

        let (matched, exact_id): (Vec<strategies::StrategyMatch>, bool) = match strategies::exact_id_match(
            &query.digits,
            &normalized_id,
            self.config.exact_id_score,
        ) {
            Some(exact) => (vec![exact], true),
            None => {
                let record_digits = cnpj::digits(raw_id);
                let fired = [
                    strategies::prefix_match(query.text, &sort_name, self.config.prefix_score),
                    strategies::all_tokens_match(
                        &query.tokens,
                        &sort_name,
                        self.config.all_tokens_score,
                    ),
                    strategies::digits_substring_match(
                        &query.digits,
                        &record_digits,
                        self.config.min_digit_substring_len,
                        self.config.digits_substring_score,
                    ),
                ]
                .into_iter()
                .flatten()
                .collect();
                (fired, false)
            }
        };

        let score: u32 = matched.iter().map(|m| m.score).sum();
        if score == 0 {
            return None;
        }

        let fired: Vec<&'static str> = matched.iter().map(|m| m.strategy).collect();
        trace!(record = record.id(), score, strategies = ?fired, "record matched");

        let identity_key = if cnpj::is_empty_like(&normalized_id) {
            record.name().to_string()
        } else {
            normalized_id
        };

        Some(ScoredCandidate {
            record,
            score,
            exact_id,
            strategies: fired,
            identity_key,
            name_len: record.name().chars().count(),
            sort_name,
        })
    }
}

/// Search with the default configuration.
pub fn search<R: CompanyRecord>(query: &str, pool: &[R]) -> Vec<CompanyMatch> {
    SearchEngine::new().search(query, pool)
}
