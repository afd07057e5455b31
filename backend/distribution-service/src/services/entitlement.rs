/// Entitlement Resolver - cumulative-access rule over the tier hierarchy
///
/// For the tier at rank r, the entitlement set is the signers of all tiers
/// with rank >= r: a member of a higher tier may authenticate for every
/// lower tier's content. Computed in a single backward scan that accumulates
/// a running suffix set, so the cost is linear in tier count and the result
/// depends on nothing but rank order.
use crate::models::{EntitlementSet, TrustedSigner};
use crate::services::registry::TierRegistry;
use tracing::debug;

/// Per-tier entitlement sets, keyed by tier identifier in rank order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitlementTable {
    entries: Vec<(String, EntitlementSet)>,
}

impl EntitlementTable {
    /// Entitlement set for a tier, if the tier exists
    pub fn get(&self, tier_id: &str) -> Option<&EntitlementSet> {
        self.entries
            .iter()
            .find(|(id, _)| id == tier_id)
            .map(|(_, set)| set)
    }

    /// Entries in ascending rank order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntitlementSet)> {
        self.entries.iter().map(|(id, set)| (id.as_str(), set))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve the entitlement table for every tier in the registry
///
/// Pure and deterministic: the same registry always produces the same
/// table, and each set enumerates its members in ascending rank order.
pub fn resolve(registry: &TierRegistry) -> EntitlementTable {
    let mut suffix: Vec<TrustedSigner> = Vec::with_capacity(registry.len());
    let mut sets: Vec<EntitlementSet> = vec![EntitlementSet::default(); registry.len()];

    // Highest rank first, accumulating the running suffix set.
    for tier in registry.tiers().iter().rev() {
        suffix.push(TrustedSigner {
            tier_id: tier.id.clone(),
            rank: tier.rank,
            signer: tier.signer.clone(),
        });
        sets[tier.rank] = EntitlementSet::from_members(suffix.clone());
    }

    let entries = registry
        .tiers()
        .iter()
        .map(|tier| (tier.id.clone(), sets[tier.rank].clone()))
        .collect::<Vec<_>>();

    debug!("Entitlement table resolved: {} tiers", entries.len());

    EntitlementTable { entries }
}
