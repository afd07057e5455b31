use anyhow::Context;
use distribution_service::config::Config;
use distribution_service::models::{OriginLocation, PolicyRef};
use distribution_service::services::{
    DistributionCompiler, DistributionEmitter, JsonFileEmitter, SignerLookup, StaticOriginLookup,
    StaticSignerLookup, TierRegistry,
};
use std::collections::HashMap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting distribution-service");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        "Compiling distribution for {} tiers (env: {})",
        config.tiers.len(),
        config.app.env
    );

    // Wire the collaborator tables from configuration
    let mut signers = HashMap::new();
    let mut tier_origins = HashMap::new();
    for tier in &config.tiers {
        signers.insert(tier.name.clone(), tier.signer_ref());
        if let Some(bucket) = &tier.bucket {
            tier_origins.insert(tier.name.clone(), OriginLocation::new(bucket.clone()));
        }
    }
    let signer_lookup = StaticSignerLookup::new(signers);
    let origin_lookup = StaticOriginLookup::new(
        tier_origins,
        Some(OriginLocation::new(config.origin.content_bucket.clone())),
    );

    // Snapshot the tier hierarchy
    let mut entries = Vec::with_capacity(config.tiers.len());
    for tier in &config.tiers {
        entries.push((tier.name.clone(), signer_lookup.signer_for(&tier.name)?));
    }
    let registry = TierRegistry::build(entries).context("Failed to build tier registry")?;

    let policy = config
        .policy
        .as_ref()
        .map(|p| PolicyRef {
            arn: p.web_acl_arn.clone(),
        });

    let mut compiler = DistributionCompiler::new(
        config.delivery_settings(),
        OriginLocation::new(config.origin.default_bucket.clone()),
        config.origin.access_control_id.clone(),
        policy,
    );
    let plan = compiler
        .compile(&registry, &origin_lookup)
        .context("Failed to compile distribution plan")?;

    let emitter = JsonFileEmitter::new(&config.app.output_path, &config.app.domain_suffix);
    let handle = emitter
        .emit(&plan)
        .await
        .context("Failed to emit distribution plan")?;
    if let Some(policy) = &plan.policy {
        emitter.attach_policy(policy).await?;
    }

    tracing::info!(
        "Distribution ready: id={}, domain={}",
        handle.distribution_id,
        handle.domain_name
    );

    Ok(())
}
