//! Detected risks to recommended actions.

use crate::catalog::ProtocolCatalog;
use calo_types::RiskRecord;
use std::collections::HashSet;
use tracing::warn;

/// Recommended when no protocol covers a detected risk.
pub const FALLBACK_ACTION: &str = "Escalate to municipal control room for manual review";

/// Ordered, deduplicated actions for the detected risks.
///
/// Risks are visited in detection order and, for each, matching protocols in
/// catalog order. An action keeps the position of its first occurrence. A
/// risk with no matching protocol contributes [`FALLBACK_ACTION`] so it never
/// goes unaddressed.
pub fn match_protocols(risks: &[RiskRecord], catalog: &ProtocolCatalog) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut actions = Vec::new();

    for risk in risks {
        let mut matched = false;
        for protocol in catalog.matching(risk.id()) {
            matched = true;
            for action in &protocol.actions {
                if !action.trim().is_empty() && seen.insert(action.as_str()) {
                    actions.push(action.clone());
                }
            }
        }
        if !matched {
            warn!(risk = %risk.id(), "no protocol matches detected risk, escalating");
            if seen.insert(FALLBACK_ACTION) {
                actions.push(FALLBACK_ACTION.to_string());
            }
        }
    }

    actions
}

/// Names of the protocols that matched at least one risk, in catalog order.
pub fn matched_protocol_names<'a>(
    risks: &[RiskRecord],
    catalog: &'a ProtocolCatalog,
) -> Vec<&'a str> {
    catalog
        .protocols()
        .iter()
        .filter(|p| risks.iter().any(|r| p.matches(r.id())))
        .map(|p| p.name.as_str())
        .collect()
}
