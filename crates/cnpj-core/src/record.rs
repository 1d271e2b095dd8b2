//! Company records as seen by the search engine.

use serde::{Deserialize, Serialize};

use crate::cnpj;

/// Read-only view of a company record owned by the storage layer.
///
/// The engine only ever borrows records and never mutates them.
pub trait CompanyRecord: Sync {
    /// Stable record identifier (row id, document key, ...).
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    /// Raw CNPJ as stored, in any punctuation.
    fn tax_id(&self) -> Option<&str>;

    /// True when the record has something to match or display.
    fn is_searchable(&self) -> bool {
        !self.name().trim().is_empty() || self.tax_id().is_some_and(|id| !cnpj::is_empty_like(id))
    }
}

/// Plain company record, used by the CLI and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "tax_id", skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
}

impl Company {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cnpj: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cnpj: cnpj.map(str::to_string),
        }
    }
}

impl CompanyRecord for Company {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tax_id(&self) -> Option<&str> {
        self.cnpj.as_deref()
    }
}

impl<T: CompanyRecord> CompanyRecord for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn tax_id(&self) -> Option<&str> {
        (**self).tax_id()
    }
}
