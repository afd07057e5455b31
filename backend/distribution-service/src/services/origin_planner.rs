/// Origin Binding Planner - position-addressed access-control overrides
///
/// Overrides are addressed by positional index in the downstream
/// configuration format, not by name, so the order bindings are emitted in
/// must be exactly the order origins appear in the final origin list. Both
/// this planner and the route compiler take that order from one canonical
/// source: the default origin at position 0, then tier origins in registry
/// rank order. Neither re-derives position from any other collection.
use crate::error::Result;
use crate::models::{OriginBinding, OriginLocation, OriginOverride};
use crate::services::emitter::OriginLookup;
use crate::services::registry::TierRegistry;
use tracing::debug;

fn access_overrides(access_control_id: &str) -> Vec<OriginOverride> {
    vec![
        OriginOverride::DisableLegacyIdentity,
        OriginOverride::SetAccessControlId {
            id: access_control_id.to_string(),
        },
    ]
}

/// Plan the ordered origin bindings for the distribution
pub fn plan(
    registry: &TierRegistry,
    origins: &dyn OriginLookup,
    default_origin: &OriginLocation,
    access_control_id: &str,
) -> Result<Vec<OriginBinding>> {
    let mut bindings = Vec::with_capacity(registry.len() + 1);

    bindings.push(OriginBinding {
        origin: default_origin.clone(),
        index: 0,
        overrides: access_overrides(access_control_id),
    });

    for tier in registry.tiers() {
        let origin = origins.origin_for(&tier.id)?;
        bindings.push(OriginBinding {
            origin,
            index: bindings.len(),
            overrides: access_overrides(access_control_id),
        });
    }

    debug!("Origin bindings planned: {} origins", bindings.len());

    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::SignerRef;
    use crate::services::emitter::StaticOriginLookup;
    use std::collections::HashMap;

    fn signer(name: &str) -> SignerRef {
        SignerRef {
            key_id: format!("{}-Key", name),
            key_group: format!("{}-Key-Group", name),
        }
    }

    fn create_test_registry() -> TierRegistry {
        TierRegistry::build(vec![
            ("bronze".to_string(), signer("Bronze")),
            ("silver".to_string(), signer("Silver")),
            ("gold".to_string(), signer("Gold")),
        ])
        .unwrap()
    }

    fn create_test_lookup() -> StaticOriginLookup {
        StaticOriginLookup::new(HashMap::new(), Some(OriginLocation::new("content-bucket")))
    }

    #[test]
    fn test_indices_are_contiguous_permutation() {
        let registry = create_test_registry();
        let bindings = plan(
            &registry,
            &create_test_lookup(),
            &OriginLocation::new("default-bucket"),
            "oac-123",
        )
        .unwrap();

        let indices: Vec<usize> = bindings.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_default_origin_occupies_position_zero() {
        let registry = create_test_registry();
        let bindings = plan(
            &registry,
            &create_test_lookup(),
            &OriginLocation::new("default-bucket"),
            "oac-123",
        )
        .unwrap();

        assert_eq!(bindings[0].origin.bucket, "default-bucket");
        assert_eq!(bindings[1].origin.bucket, "content-bucket");
    }

    #[test]
    fn test_tier_origins_follow_rank_order() {
        let registry = create_test_registry();

        let mut by_tier = HashMap::new();
        by_tier.insert("bronze".to_string(), OriginLocation::new("bronze-bucket"));
        by_tier.insert("silver".to_string(), OriginLocation::new("silver-bucket"));
        by_tier.insert("gold".to_string(), OriginLocation::new("gold-bucket"));
        let lookup = StaticOriginLookup::new(by_tier, None);

        let bindings = plan(
            &registry,
            &lookup,
            &OriginLocation::new("default-bucket"),
            "oac-123",
        )
        .unwrap();

        let buckets: Vec<&str> = bindings.iter().map(|b| b.origin.bucket.as_str()).collect();
        assert_eq!(
            buckets,
            vec![
                "default-bucket",
                "bronze-bucket",
                "silver-bucket",
                "gold-bucket"
            ]
        );
    }

    #[test]
    fn test_every_binding_carries_access_overrides() {
        let registry = create_test_registry();
        let bindings = plan(
            &registry,
            &create_test_lookup(),
            &OriginLocation::new("default-bucket"),
            "oac-123",
        )
        .unwrap();

        for binding in &bindings {
            assert!(binding
                .overrides
                .contains(&OriginOverride::DisableLegacyIdentity));
            assert!(binding.overrides.contains(&OriginOverride::SetAccessControlId {
                id: "oac-123".to_string()
            }));
        }
    }

    #[test]
    fn test_missing_origin_aborts_planning() {
        let registry = create_test_registry();
        let lookup = StaticOriginLookup::new(HashMap::new(), None);

        let result = plan(
            &registry,
            &lookup,
            &OriginLocation::new("default-bucket"),
            "oac-123",
        );

        match result.unwrap_err() {
            AppError::OriginNotFound(id) => assert_eq!(id, "bronze"),
            other => panic!("expected OriginNotFound, got {:?}", other),
        }
    }
}
