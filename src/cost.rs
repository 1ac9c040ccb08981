use crate::config::CostMatchPolicy;
use crate::schema::{CostMatch, InventoryEntry};
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct CostResolution {
    pub cost_price: f64,
    pub margin_percent: f64,
    pub matched: CostMatch,
    /// Inventory name that produced the match.
    pub matched_name: Option<String>,
}

impl CostResolution {
    pub fn unresolved(default_margin_percent: f64) -> Self {
        Self {
            cost_price: 0.0,
            margin_percent: default_margin_percent,
            matched: CostMatch::Unresolved,
            matched_name: None,
        }
    }

    fn from_entry(entry: &InventoryEntry, matched: CostMatch) -> Self {
        Self {
            cost_price: entry.cost_price,
            margin_percent: entry.margin_percent,
            matched,
            matched_name: Some(entry.name.clone()),
        }
    }
}

/// Looks up the cost price of a sold item. Implementations must not change
/// their answers during a parse.
pub trait CostResolver {
    fn resolve_cost(&self, item_name: &str) -> CostResolution;
}

/// Immutable copy of the inventory taken for one parse.
#[derive(Debug, Clone, Default)]
pub struct InventorySnapshot {
    entries: Vec<InventoryEntry>,
    policy: CostMatchPolicy,
}

impl InventorySnapshot {
    pub fn new(entries: Vec<InventoryEntry>) -> Self {
        Self {
            entries,
            policy: CostMatchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CostMatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &CostMatchPolicy {
        &self.policy
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First matching entry by priority: exact, case-insensitive, then
    /// substring in either direction (when the policy allows it).
    pub fn find(&self, item_name: &str) -> Option<(&InventoryEntry, CostMatch)> {
        let name = item_name.trim();
        if name.is_empty() {
            return None;
        }

        if let Some(entry) = self.entries.iter().find(|e| e.name == name) {
            return Some((entry, CostMatch::Exact));
        }

        let lowered = name.to_lowercase();
        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.name.to_lowercase() == lowered)
        {
            return Some((entry, CostMatch::CaseInsensitive));
        }

        if !self.policy.allow_fuzzy {
            return None;
        }

        // Ambiguous: the first entry in inventory order wins.
        self.entries
            .iter()
            .find(|e| {
                let candidate = e.name.trim().to_lowercase();
                !candidate.is_empty()
                    && (candidate.contains(&lowered) || lowered.contains(&candidate))
            })
            .map(|entry| (entry, CostMatch::Fuzzy))
    }
}

impl CostResolver for InventorySnapshot {
    fn resolve_cost(&self, item_name: &str) -> CostResolution {
        match self.find(item_name) {
            Some((entry, matched)) => {
                debug!(
                    "Resolved cost for '{}' via {:?} match on '{}': {}",
                    item_name, matched, entry.name, entry.cost_price
                );
                CostResolution::from_entry(entry, matched)
            }
            None => {
                debug!("No inventory match for '{}'", item_name);
                CostResolution::unresolved(self.policy.default_margin_percent)
            }
        }
    }
}

impl FromIterator<InventoryEntry> for InventorySnapshot {
    fn from_iter<I: IntoIterator<Item = InventoryEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
