/// External collaborator boundaries
///
/// The compiler core stays pure; everything that touches provisioned
/// infrastructure sits behind the traits here. `OriginLookup` is backed by
/// object-storage provisioning, `SignerLookup` by key management, and
/// `DistributionEmitter` by the delivery-network configuration layer. The
/// shipped implementations are config-backed tables plus a JSON renderer;
/// real backends are wired in by the deployment environment.
use crate::error::{AppError, Result};
use crate::models::{DistributionHandle, DistributionPlan, OriginLocation, PolicyRef, SignerRef};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

/// Resolves a tier to its content storage location
pub trait OriginLookup: Send + Sync {
    fn origin_for(&self, tier_id: &str) -> Result<OriginLocation>;
}

/// Resolves a tier to its verification-key handle
pub trait SignerLookup: Send + Sync {
    fn signer_for(&self, tier_id: &str) -> Result<SignerRef>;
}

/// Hands a finished plan to the delivery-network configuration layer
#[async_trait]
pub trait DistributionEmitter: Send + Sync {
    /// Materialize the plan and return the distribution identifiers
    async fn emit(&self, plan: &DistributionPlan) -> Result<DistributionHandle>;

    /// Attach an external firewall/geo policy at the distribution level
    async fn attach_policy(&self, policy: &PolicyRef) -> Result<()>;
}

/// Origin lookup over a static table, with an optional shared fallback
///
/// Mirrors the deployment layout where every tier's content lives in one
/// shared bucket unless a tier is given its own.
#[derive(Debug, Clone, Default)]
pub struct StaticOriginLookup {
    by_tier: HashMap<String, OriginLocation>,
    shared: Option<OriginLocation>,
}

impl StaticOriginLookup {
    pub fn new(by_tier: HashMap<String, OriginLocation>, shared: Option<OriginLocation>) -> Self {
        Self { by_tier, shared }
    }
}

impl OriginLookup for StaticOriginLookup {
    fn origin_for(&self, tier_id: &str) -> Result<OriginLocation> {
        self.by_tier
            .get(tier_id)
            .or(self.shared.as_ref())
            .cloned()
            .ok_or_else(|| AppError::OriginNotFound(tier_id.to_string()))
    }
}

/// Signer lookup over a static table
#[derive(Debug, Clone, Default)]
pub struct StaticSignerLookup {
    by_tier: HashMap<String, SignerRef>,
}

impl StaticSignerLookup {
    pub fn new(by_tier: HashMap<String, SignerRef>) -> Self {
        Self { by_tier }
    }
}

impl SignerLookup for StaticSignerLookup {
    fn signer_for(&self, tier_id: &str) -> Result<SignerRef> {
        self.by_tier
            .get(tier_id)
            .cloned()
            .ok_or_else(|| AppError::SignerNotFound(tier_id.to_string()))
    }
}

/// Emitter that renders the plan as JSON for the downstream config layer
pub struct JsonFileEmitter {
    output_path: PathBuf,
    domain_suffix: String,
}

impl JsonFileEmitter {
    pub fn new(output_path: impl Into<PathBuf>, domain_suffix: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            domain_suffix: domain_suffix.into(),
        }
    }
}

#[async_trait]
impl DistributionEmitter for JsonFileEmitter {
    async fn emit(&self, plan: &DistributionPlan) -> Result<DistributionHandle> {
        let rendered = serde_json::to_string_pretty(plan)
            .map_err(|e| AppError::EmitError(format!("failed to render plan: {}", e)))?;

        tokio::fs::write(&self.output_path, rendered).await?;

        let distribution_id = format!("dist-{}", Uuid::new_v4().simple());
        let handle = DistributionHandle {
            domain_name: format!("{}.{}", distribution_id, self.domain_suffix),
            distribution_id,
            created_at: Utc::now(),
        };

        info!(
            "Distribution plan emitted: path={}, id={}, domain={}",
            self.output_path.display(),
            handle.distribution_id,
            handle.domain_name
        );

        Ok(handle)
    }

    async fn attach_policy(&self, policy: &PolicyRef) -> Result<()> {
        info!("Policy attached at distribution level: {}", policy.arn);
        Ok(())
    }
}
