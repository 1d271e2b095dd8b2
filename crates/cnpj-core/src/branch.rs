//! Branch Resolver
//!
//! Interprets the order segment of a CNPJ and reconciles branch identifiers
//! with their headquarters. The `decide_*` functions drive a single
//! confirmation step through a caller-supplied async predicate; the resolver
//! itself never touches storage or the network.
//!
//! # Decision table
//!
//! ```text
//! candidate empty / headquarters ──────────────► candidate
//! candidate branch ── confirm(hq, branch) ─ yes ► hq (check digits recomputed)
//!                                          └ no ─► candidate
//! ```

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cnpj::{self, CNPJ_LEN};

/// Order segment that marks the headquarters establishment.
pub const HEADQUARTERS_ORDER: &str = "0001";

/// Kind of establishment a CNPJ denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Establishment {
    /// Matriz (order `0001`)
    Headquarters,
    /// Filial (any other order)
    Branch,
}

impl std::fmt::Display for Establishment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Headquarters => write!(f, "headquarters"),
            Self::Branch => write!(f, "branch"),
        }
    }
}

/// Establishment kind of an identifier, `None` unless it normalizes to 14 digits.
pub fn establishment(id: &str) -> Option<Establishment> {
    let id = cnpj::normalize(id);
    cnpj::order_segment(&id).map(|order| {
        if order == HEADQUARTERS_ORDER {
            Establishment::Headquarters
        } else {
            Establishment::Branch
        }
    })
}

pub fn is_headquarters(id: &str) -> bool {
    establishment(id) == Some(Establishment::Headquarters)
}

pub fn is_branch(id: &str) -> bool {
    establishment(id) == Some(Establishment::Branch)
}

/// Swap the order segment for `0001` and recompute both check digits, so the
/// result is itself a valid identifier for the same root.
///
/// Input that does not normalize to 14 digits is returned normalized and
/// otherwise unchanged.
pub fn to_headquarters_id(id: &str) -> String {
    let id = cnpj::normalize(id);
    let Some(root) = cnpj::root_segment(&id) else {
        return id;
    };

    let body = format!("{}{}", root, HEADQUARTERS_ORDER);
    match cnpj::check_digits(&body) {
        Some((first, second)) => {
            let mut out = String::with_capacity(CNPJ_LEN);
            out.push_str(&body);
            out.push(char::from(b'0' + first));
            out.push(char::from(b'0' + second));
            out
        }
        None => id,
    }
}

/// Pick the identifier to persist for a record.
///
/// The enriched value is used only when the current one is empty-like and the
/// enriched one is not. A branch candidate is then offered to `confirm` as
/// `(headquarters, branch)`; a `true` answer swaps in the headquarters id.
///
/// Errors from `confirm` are returned untouched. If the future is dropped
/// before it resolves nothing has been changed.
pub async fn decide_final<F, Fut, E>(current: &str, enriched: &str, confirm: F) -> Result<String, E>
where
    F: FnOnce(String, String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let candidate = if cnpj::is_empty_like(current) && !cnpj::is_empty_like(enriched) {
        debug!("using enriched CNPJ in place of empty current value");
        cnpj::normalize(enriched)
    } else {
        cnpj::normalize(current)
    };

    resolve_branch(candidate, confirm).await
}

/// Narrower variant run ahead of an external lookup: only a non-empty branch
/// identifier triggers confirmation, anything else comes back normalized.
pub async fn decide_before_query<F, Fut, E>(current: &str, confirm: F) -> Result<String, E>
where
    F: FnOnce(String, String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let candidate = cnpj::normalize(current);
    if cnpj::is_empty_like(&candidate) {
        return Ok(candidate);
    }
    resolve_branch(candidate, confirm).await
}

async fn resolve_branch<F, Fut, E>(candidate: String, confirm: F) -> Result<String, E>
where
    F: FnOnce(String, String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    if !is_branch(&candidate) {
        return Ok(candidate);
    }

    let headquarters = to_headquarters_id(&candidate);
    let accepted = confirm(headquarters.clone(), candidate.clone()).await?;
    debug!(
        branch = %candidate,
        headquarters = %headquarters,
        accepted,
        "branch confirmation answered"
    );

    Ok(if accepted { headquarters } else { candidate })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::convert::Infallible;

    const HQ: &str = "54550752000155";
    // Same root, order 0002, valid check digits
    const BRANCH: &str = "54550752000236";

    async fn yes(_: String, _: String) -> Result<bool, Infallible> {
        Ok(true)
    }

    async fn no(_: String, _: String) -> Result<bool, Infallible> {
        Ok(false)
    }

    #[test]
    fn test_establishment() {
        assert!(is_headquarters(HQ));
        assert!(!is_branch(HQ));
        assert!(is_branch(BRANCH));
        assert!(is_branch("54.550.752/0002-36"));
        assert_eq!(establishment(""), None);
        assert!(!is_branch(""));
        assert!(!is_headquarters("1234567890123456"));
    }

    #[test]
    fn test_branch_fixture_is_valid() {
        assert!(cnpj::is_valid_checksum(BRANCH));
    }

    #[test]
    fn test_to_headquarters_recomputes_check_digits() {
        let hq = to_headquarters_id(BRANCH);
        assert_eq!(hq, HQ);
        assert!(cnpj::is_valid_checksum(&hq));

        let hq = to_headquarters_id("12.345.678/9012-30");
        assert_eq!(&hq[..12], "123456780001");
        assert!(cnpj::is_valid_checksum(&hq));
    }

    #[test]
    fn test_to_headquarters_passthrough() {
        assert_eq!(to_headquarters_id(HQ), HQ);
        assert_eq!(to_headquarters_id(""), "");
        assert_eq!(to_headquarters_id("1234567890123456"), "1234567890123456");
    }

    #[tokio::test]
    async fn test_final_prefers_current() {
        let out = decide_final("54.550.752/0001-55", "11222333000181", no).await.unwrap();
        assert_eq!(out, HQ);
    }

    #[tokio::test]
    async fn test_final_falls_back_to_enriched() {
        let out = decide_final("", "54.550.752/0001-55", no).await.unwrap();
        assert_eq!(out, HQ);

        let out = decide_final("000.000.000/0000-00", HQ, no).await.unwrap();
        assert_eq!(out, HQ);
    }

    #[tokio::test]
    async fn test_final_branch_accepted() {
        let out = decide_final(BRANCH, "", yes).await.unwrap();
        assert_eq!(out, HQ);
    }

    #[tokio::test]
    async fn test_final_branch_declined() {
        let out = decide_final("", BRANCH, no).await.unwrap();
        assert_eq!(out, BRANCH);
    }

    #[tokio::test]
    async fn test_confirm_receives_headquarters_then_branch() {
        let seen = Cell::new(None);
        let out = decide_final(BRANCH, "", |hq, branch| {
            seen.set(Some((hq, branch)));
            async { Ok::<_, Infallible>(false) }
        })
        .await
        .unwrap();

        assert_eq!(out, BRANCH);
        assert_eq!(seen.take(), Some((HQ.to_string(), BRANCH.to_string())));
    }

    #[tokio::test]
    async fn test_headquarters_skips_confirmation() {
        let called = Cell::new(false);
        let out = decide_final(HQ, "", |_, _| {
            called.set(true);
            async { Ok::<_, Infallible>(true) }
        })
        .await
        .unwrap();

        assert_eq!(out, HQ);
        assert!(!called.get());
    }

    #[tokio::test]
    async fn test_confirm_error_propagates() {
        let out = decide_final(BRANCH, "", |_, _| async { Err::<bool, _>("ui closed") }).await;
        assert_eq!(out, Err("ui closed"));
    }

    #[tokio::test]
    async fn test_before_query() {
        assert_eq!(decide_before_query(BRANCH, yes).await.unwrap(), HQ);
        assert_eq!(decide_before_query(BRANCH, no).await.unwrap(), BRANCH);
        assert_eq!(decide_before_query("54.550.752/0001-55", yes).await.unwrap(), HQ);
        assert_eq!(decide_before_query("", yes).await.unwrap(), "");
        assert_eq!(decide_before_query("0000", yes).await.unwrap(), "00000000000000");
    }
}
