/// Tier Registry - the source of truth for hierarchy order
///
/// Holds the ordered list of membership tiers and the signing-key handle
/// bound to each. Insertion order is rank order; rank 0 is the least
/// privileged tier. The registry is read-only after construction and is
/// owned exclusively by the compilation run that built it.
use crate::error::{AppError, Result};
use crate::models::{SignerRef, Tier};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TierRegistry {
    tiers: Vec<Tier>,
}

impl TierRegistry {
    /// Build a registry from an ordered sequence of (identifier, signer) pairs
    ///
    /// Fails with `DuplicateTier` if any identifier repeats and with
    /// `EmptyRegistry` if the sequence is empty. Ranks are assigned from
    /// insertion order, contiguous from 0.
    pub fn build(entries: Vec<(String, SignerRef)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(AppError::EmptyRegistry);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        let mut tiers = Vec::with_capacity(entries.len());

        for (rank, (id, signer)) in entries.into_iter().enumerate() {
            if !seen.insert(id.clone()) {
                return Err(AppError::DuplicateTier(id));
            }
            tiers.push(Tier { id, rank, signer });
        }

        debug!("Tier registry built: {} tiers", tiers.len());

        Ok(Self { tiers })
    }

    /// Zero-based rank of a tier, or `UnknownTier`
    pub fn rank_of(&self, tier_id: &str) -> Result<usize> {
        self.tiers
            .iter()
            .find(|t| t.id == tier_id)
            .map(|t| t.rank)
            .ok_or_else(|| AppError::UnknownTier(tier_id.to_string()))
    }

    /// Tiers in ascending rank order
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
