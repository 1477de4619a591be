//! Operational protocol catalog.

use crate::error::CatalogError;
use calo_types::{Protocol, RiskKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

const BUILTIN_CATALOG: &str = include_str!("../catalog/protocols.json");

/// Validated, ordered protocol catalog. Read-only once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDocument")]
pub struct ProtocolCatalog {
    protocols: Vec<Protocol>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    protocols: Vec<Protocol>,
}

impl TryFrom<CatalogDocument> for ProtocolCatalog {
    type Error = CatalogError;

    fn try_from(doc: CatalogDocument) -> Result<Self, Self::Error> {
        ProtocolCatalog::new(doc.protocols)
    }
}

impl ProtocolCatalog {
    /// Validate and wrap protocols.
    ///
    /// Ids must be unique, and every protocol must match at least one risk
    /// and carry at least one action.
    pub fn new(protocols: Vec<Protocol>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        for protocol in &protocols {
            if !ids.insert(protocol.id.as_str()) {
                return Err(CatalogError::DuplicateProtocol(protocol.id.clone()));
            }
            if protocol.matches_risk_ids.is_empty() {
                return Err(CatalogError::NoRiskIds(protocol.id.clone()));
            }
            if protocol.actions.iter().all(|a| a.trim().is_empty()) {
                return Err(CatalogError::EmptyActions(protocol.id.clone()));
            }
        }

        let catalog = Self { protocols };
        for kind in catalog.uncovered() {
            warn!(risk = %kind, "no protocol covers risk; detections will escalate to manual review");
        }
        Ok(catalog)
    }

    /// The catalog shipped with the engine.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a `{"protocols": [...]}` document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: ProtocolCatalog = serde_json::from_str(json)?;
        info!(protocols = catalog.len(), "loaded protocol catalog");
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Protocols matching `kind`, in catalog order.
    pub fn matching(&self, kind: RiskKind) -> impl Iterator<Item = &Protocol> {
        self.protocols.iter().filter(move |p| p.matches(kind))
    }

    /// Risk kinds no protocol matches.
    pub fn uncovered(&self) -> Vec<RiskKind> {
        RiskKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.matching(*kind).next().is_none())
            .collect()
    }

    pub fn protocols(&self) -> &[Protocol] {
        &self.protocols
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }
}
