use crate::risk::RiskKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An operational protocol: ordered actions for one or more risk scenarios.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protocol {
    pub id: String,
    pub name: String,
    pub matches_risk_ids: BTreeSet<RiskKind>,
    pub actions: Vec<String>,
}

impl Protocol {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            matches_risk_ids: BTreeSet::new(),
            actions: Vec::new(),
        }
    }

    pub fn matching(mut self, kind: RiskKind) -> Self {
        self.matches_risk_ids.insert(kind);
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn matches(&self, kind: RiskKind) -> bool {
        self.matches_risk_ids.contains(&kind)
    }
}
