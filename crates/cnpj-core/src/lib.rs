//! CNPJ Core
//!
//! Pure computational core for handling Brazilian company tax identifiers
//! and matching company records:
//!
//! - [`cnpj`] - normalize, validate and format identifiers
//! - [`branch`] - headquarters/branch detection and canonicalization
//! - [`search`] - scoring, deduplication and ranking of company records
//! - [`confirm`] - channel-backed user confirmation (feature `channel`)
//!
//! Nothing here performs I/O. The only suspension point is the confirmation
//! step of the branch resolver.
//!
//! # Features
//!
//! - `channel` (default) - tokio mpsc/oneshot confirmer
//! - `parallel` - rayon scoring for large pools
//!
//! # Example
//!
//! ```rust
//! use cnpj_core::{cnpj, search, Company};
//!
//! assert!(cnpj::is_valid_checksum("54.550.752/0001-55"));
//!
//! let pool = vec![Company::new("1", "ACME Ltda", Some("54550752000155"))];
//! let matches = search("54550752000155", &pool);
//! assert_eq!(matches[0].score, 1000);
//! ```

pub mod branch;
pub mod cnpj;
#[cfg(feature = "channel")]
pub mod confirm;
pub mod error;
pub mod record;
pub mod search;

// Re-export main types at crate root
pub use branch::{decide_before_query, decide_final, Establishment};
pub use cnpj::Cnpj;
#[cfg(feature = "channel")]
pub use confirm::{ChannelConfirmer, ConfirmRequest};
pub use error::{Error, Result};
pub use record::{Company, CompanyRecord};
pub use search::{search, CompanyMatch, SearchConfig, SearchEngine};
