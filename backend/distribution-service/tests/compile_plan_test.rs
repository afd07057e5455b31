//! End-to-end compilation scenarios
//!
//! Drives the full pipeline the way the binary does: configured tiers ->
//! registry snapshot -> compiled plan -> JSON emission, and checks the
//! positional and entitlement invariants on the result.

use distribution_service::error::AppError;
use distribution_service::models::{
    DeliverySettings, OriginLocation, OriginOverride, PolicyRef, SignerRef,
};
use distribution_service::services::{
    DistributionCompiler, DistributionEmitter, JsonFileEmitter, StaticOriginLookup,
    TierRegistry,
};
use std::collections::HashMap;

fn signer(name: &str) -> SignerRef {
    SignerRef {
        key_id: format!("{}-Key", name),
        key_group: format!("{}-Key-Group", name),
    }
}

fn registry_of(names: &[&str]) -> TierRegistry {
    TierRegistry::build(
        names
            .iter()
            .map(|n| (n.to_string(), signer(n)))
            .collect(),
    )
    .unwrap()
}

fn shared_lookup() -> StaticOriginLookup {
    StaticOriginLookup::new(HashMap::new(), Some(OriginLocation::new("content-bucket")))
}

fn compiler_with(policy: Option<PolicyRef>) -> DistributionCompiler {
    DistributionCompiler::new(
        DeliverySettings::default(),
        OriginLocation::new("public-content"),
        "oac-e2e".to_string(),
        policy,
    )
}

#[test]
fn test_three_tier_scenario() {
    let registry = registry_of(&["basic", "standard", "premium"]);
    let plan = compiler_with(None)
        .compile(&registry, &shared_lookup())
        .unwrap();

    // Default route is present exactly once and carries no restrictions.
    assert!(plan.default_route.is_default());
    assert!(plan.default_route.entitlements.is_empty());
    assert!(plan.routes.iter().all(|r| !r.is_default()));

    // basic/* trusts 3 signers, standard/* 2, premium/* 1.
    assert_eq!(plan.routes[0].path_pattern.as_deref(), Some("basic/*"));
    assert_eq!(plan.routes[0].entitlements.len(), 3);
    assert_eq!(plan.routes[1].entitlements.len(), 2);
    assert_eq!(plan.routes[2].path_pattern.as_deref(), Some("premium/*"));
    assert_eq!(plan.routes[2].entitlements.len(), 1);
}

#[test]
fn test_bronze_silver_gold_binding_layout() {
    let registry = registry_of(&["Bronze", "Silver", "Gold"]);
    let plan = compiler_with(None)
        .compile(&registry, &shared_lookup())
        .unwrap();

    let indices: Vec<usize> = plan.origins.iter().map(|b| b.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);

    // Binding 0 is the default origin; bindings 1..=3 align with routes.
    assert_eq!(plan.origins[0].origin, plan.default_route.origin);
    for (slot, route) in plan.routes.iter().enumerate() {
        assert_eq!(plan.origins[slot + 1].origin, route.origin);
    }

    for binding in &plan.origins {
        assert!(binding
            .overrides
            .contains(&OriginOverride::DisableLegacyIdentity));
        assert!(binding.overrides.contains(&OriginOverride::SetAccessControlId {
            id: "oac-e2e".to_string()
        }));
    }
}

#[test]
fn test_entitlement_membership_direction() {
    let registry = registry_of(&["Bronze", "Silver", "Gold"]);
    let plan = compiler_with(None)
        .compile(&registry, &shared_lookup())
        .unwrap();

    let bronze = &plan.routes[0].entitlements;
    let gold = &plan.routes[2].entitlements;

    assert!(bronze.contains_tier("Gold"));
    assert!(bronze.contains_tier("Bronze"));
    assert!(!gold.contains_tier("Bronze"));
    assert!(!gold.contains_tier("Silver"));
}

#[test]
fn test_single_tier_plan() {
    let registry = registry_of(&["gold"]);
    let plan = compiler_with(None)
        .compile(&registry, &shared_lookup())
        .unwrap();

    assert_eq!(plan.routes.len(), 1);
    assert_eq!(plan.origins.len(), 2);
    assert_eq!(plan.routes[0].entitlements.len(), 1);
}

#[test]
fn test_empty_tier_list_produces_no_plan() {
    let result = TierRegistry::build(Vec::new());
    assert!(matches!(result.unwrap_err(), AppError::EmptyRegistry));
}

#[test]
fn test_duplicate_tier_fails_before_resolution() {
    let result = TierRegistry::build(vec![
        ("gold".to_string(), signer("Gold")),
        ("gold".to_string(), signer("Gold")),
    ]);
    match result.unwrap_err() {
        AppError::DuplicateTier(id) => assert_eq!(id, "gold"),
        other => panic!("expected DuplicateTier, got {:?}", other),
    }
}

#[test]
fn test_missing_origin_aborts_whole_run() {
    let registry = registry_of(&["basic", "standard", "premium"]);

    let mut by_tier = HashMap::new();
    by_tier.insert("basic".to_string(), OriginLocation::new("basic-bucket"));
    by_tier.insert("premium".to_string(), OriginLocation::new("premium-bucket"));
    let lookup = StaticOriginLookup::new(by_tier, None);

    let result = compiler_with(None).compile(&registry, &lookup);
    match result.unwrap_err() {
        AppError::OriginNotFound(id) => assert_eq!(id, "standard"),
        other => panic!("expected OriginNotFound, got {:?}", other),
    }
}

#[test]
fn test_plan_carries_policy_reference() {
    let registry = registry_of(&["Bronze", "Silver", "Gold"]);
    let policy = PolicyRef {
        arn: "arn:aws:wafv2:us-east-1:123:global/webacl/geo".to_string(),
    };

    let plan = compiler_with(Some(policy.clone()))
        .compile(&registry, &shared_lookup())
        .unwrap();
    assert_eq!(plan.policy.as_ref(), Some(&policy));
}

#[test]
fn test_plan_json_round_trip() {
    let registry = registry_of(&["Bronze", "Silver", "Gold"]);
    let plan = compiler_with(None)
        .compile(&registry, &shared_lookup())
        .unwrap();

    let json = serde_json::to_string(&plan).unwrap();
    let parsed: distribution_service::models::DistributionPlan =
        serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, plan);
}

#[tokio::test]
async fn test_emitter_writes_plan_and_returns_handle() {
    let registry = registry_of(&["Bronze", "Silver", "Gold"]);
    let plan = compiler_with(None)
        .compile(&registry, &shared_lookup())
        .unwrap();

    let output = std::env::temp_dir().join(format!("plan-{}.json", plan.plan_id));
    let emitter = JsonFileEmitter::new(&output, "cdn.example.net");

    let handle = emitter.emit(&plan).await.unwrap();
    assert!(handle.distribution_id.starts_with("dist-"));
    assert!(handle.domain_name.ends_with(".cdn.example.net"));

    let written = std::fs::read_to_string(&output).unwrap();
    let parsed: distribution_service::models::DistributionPlan =
        serde_json::from_str(&written).unwrap();
    assert_eq!(parsed.routes.len(), 3);
    assert_eq!(parsed.origins.len(), 4);

    std::fs::remove_file(&output).ok();
}
