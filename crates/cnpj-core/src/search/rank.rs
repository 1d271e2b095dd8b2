//! Deduplication and ranking of scored candidates.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::trace;

use super::engine::ScoredCandidate;
use crate::record::CompanyRecord;

/// Keep the best-scoring candidate per identity key.
///
/// A later candidate replaces the stored one only on a strictly greater
/// score, so ties keep the first seen. Output preserves first-seen order.
pub fn dedup_best<'a, R: CompanyRecord>(
    candidates: Vec<ScoredCandidate<'a, R>>,
) -> Vec<ScoredCandidate<'a, R>> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(candidates.len());
    let mut best: Vec<ScoredCandidate<'a, R>> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        match slots.get(&candidate.identity_key) {
            Some(&idx) => {
                if candidate.score > best[idx].score {
                    trace!(
                        key = %candidate.identity_key,
                        old = best[idx].score,
                        new = candidate.score,
                        "replacing duplicate candidate"
                    );
                    best[idx] = candidate;
                }
            }
            None => {
                slots.insert(candidate.identity_key.clone(), best.len());
                best.push(candidate);
            }
        }
    }

    best
}

/// Exact CNPJ hits first, then score descending, then shorter names, then
/// name order.
///
/// Name order compares accent-folded lowercase names first and the raw
/// names second, which approximates locale collation for Portuguese names.
pub fn compare_candidates<R: CompanyRecord>(
    a: &ScoredCandidate<'_, R>,
    b: &ScoredCandidate<'_, R>,
) -> Ordering {
    b.exact_id
        .cmp(&a.exact_id)
        .then_with(|| b.score.cmp(&a.score))
        .then_with(|| a.name_len.cmp(&b.name_len))
        .then_with(|| a.sort_name.cmp(&b.sort_name))
        .then_with(|| a.record.name().cmp(b.record.name()))
}

pub fn sort_candidates<R: CompanyRecord>(candidates: &mut [ScoredCandidate<'_, R>]) {
    candidates.sort_by(compare_candidates);
}
