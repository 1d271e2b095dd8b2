//! Company Matching Engine
//!
//! Scores a pool of company records against a free-text or CNPJ query,
//! collapses duplicates and returns a bounded, ranked projection.
//!
//! # Signals
//!
//! 1. Exact CNPJ (score: 1000) - short-circuits everything else
//! 2. Name prefix (score: 800)
//! 3. All query tokens inside the name (score: 700)
//! 4. Five or more query digits inside the CNPJ (score: 500)
//!
//! Signals 2-4 add up. Records scoring zero are dropped.
//!
//! # Example
//!
//! ```rust
//! use cnpj_core::record::Company;
//! use cnpj_core::search::search;
//!
//! let pool = vec![
//!     Company::new("1", "ABC Ltda", Some("54.550.752/0001-55")),
//!     Company::new("2", "ABCD Ltda", None),
//! ];
//!
//! let matches = search("abc", &pool);
//! assert_eq!(matches[0].name, "ABC Ltda");
//! ```

mod engine;
pub mod rank;
mod strategies;
mod text;

pub use engine::{search, CompanyMatch, ScoredCandidate, SearchConfig, SearchEngine};
pub use strategies::StrategyMatch;
pub use text::{normalize_text, tokens};
