/// Configuration management for distribution-service
///
/// Loads configuration from environment variables with sensible defaults.
/// The tier hierarchy is an explicit input: a JSON document supplied via
/// `TIERS_PATH` or `TIERS_JSON`, falling back to the stock three-tier
/// hierarchy. There is no ambient tier state anywhere else.
use crate::error::{AppError, Result};
use crate::models::{
    AccessLogConfig, DeliverySettings, HttpVersion, PriceClass, SignerRef, ViewerProtocolPolicy,
};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub distribution: DistributionConfig,
    pub origin: OriginConfig,
    pub tiers: Vec<TierEntry>,
    pub policy: Option<PolicyConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub output_path: String,
    pub domain_suffix: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DistributionConfig {
    pub comment: String,
    pub enabled: bool,
    pub viewer_protocol: String,
    pub price_class: String,
    pub default_root_object: String,
    pub log_bucket: Option<String>,
    pub log_prefix: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OriginConfig {
    /// Bucket serving the unauthenticated default route
    pub default_bucket: String,
    /// Shared bucket for tiers without a bucket of their own
    pub content_bucket: String,
    /// Externally provisioned origin-access-control id
    pub access_control_id: String,
}

/// One tier in the configured hierarchy, lowest rank first
#[derive(Clone, Debug, Deserialize)]
pub struct TierEntry {
    pub name: String,
    pub key_id: String,
    #[serde(default)]
    pub key_group: Option<String>,
    #[serde(default)]
    pub bucket: Option<String>,
}

impl TierEntry {
    /// Verification-key handle for this tier
    pub fn signer_ref(&self) -> SignerRef {
        SignerRef {
            key_id: self.key_id.clone(),
            key_group: self
                .key_group
                .clone()
                .unwrap_or_else(|| format!("{}-Key-Group", self.name)),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PolicyConfig {
    pub web_acl_arn: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                output_path: std::env::var("PLAN_OUTPUT_PATH")
                    .unwrap_or_else(|_| "distribution-plan.json".to_string()),
                domain_suffix: std::env::var("CDN_DOMAIN_SUFFIX")
                    .unwrap_or_else(|_| "cdn.example.net".to_string()),
            },
            distribution: DistributionConfig {
                comment: std::env::var("DISTRIBUTION_COMMENT")
                    .unwrap_or_else(|_| "CDN to serve private tiered content".to_string()),
                enabled: std::env::var("DISTRIBUTION_ENABLED")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(true),
                viewer_protocol: std::env::var("VIEWER_PROTOCOL_POLICY")
                    .unwrap_or_else(|_| "redirect-to-https".to_string()),
                price_class: std::env::var("PRICE_CLASS").unwrap_or_else(|_| "200".to_string()),
                default_root_object: std::env::var("DEFAULT_ROOT_OBJECT")
                    .unwrap_or_else(|_| "index.html".to_string()),
                log_bucket: std::env::var("LOG_BUCKET").ok(),
                log_prefix: std::env::var("LOG_PREFIX").unwrap_or_else(|_| "cdn-logs".to_string()),
            },
            origin: OriginConfig {
                default_bucket: std::env::var("DEFAULT_ORIGIN_BUCKET")
                    .unwrap_or_else(|_| "public-content".to_string()),
                content_bucket: std::env::var("CONTENT_BUCKET")
                    .unwrap_or_else(|_| "private-content".to_string()),
                access_control_id: std::env::var("ORIGIN_ACCESS_CONTROL_ID")
                    .unwrap_or_else(|_| "oac-default".to_string()),
            },
            tiers: load_tiers()?,
            policy: std::env::var("WEB_ACL_ARN")
                .ok()
                .map(|web_acl_arn| PolicyConfig { web_acl_arn }),
        })
    }

    /// Delivery settings block for the plan
    pub fn delivery_settings(&self) -> DeliverySettings {
        DeliverySettings {
            comment: self.distribution.comment.clone(),
            enabled: self.distribution.enabled,
            http_version: HttpVersion::default(),
            price_class: PriceClass::parse(&self.distribution.price_class),
            viewer_protocol: ViewerProtocolPolicy::parse(&self.distribution.viewer_protocol),
            default_root_object: Some(self.distribution.default_root_object.clone()),
            cache_policy: Default::default(),
            origin_request_policy: Default::default(),
            access_log: self.distribution.log_bucket.clone().map(|bucket| {
                AccessLogConfig {
                    bucket,
                    prefix: self.distribution.log_prefix.clone(),
                }
            }),
        }
    }
}

fn load_tiers() -> Result<Vec<TierEntry>> {
    if let Ok(path) = std::env::var("TIERS_PATH") {
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| AppError::ConfigError(format!("failed to read {}: {}", path, e)))?;
        return parse_tiers(&raw);
    }
    if let Ok(raw) = std::env::var("TIERS_JSON") {
        return parse_tiers(&raw);
    }
    Ok(default_tiers())
}

fn parse_tiers(raw: &str) -> Result<Vec<TierEntry>> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::ConfigError(format!("invalid tier document: {}", e)))
}

/// The stock three-tier hierarchy, lowest rank first
fn default_tiers() -> Vec<TierEntry> {
    ["Bronze", "Silver", "Gold"]
        .iter()
        .map(|name| TierEntry {
            name: name.to_string(),
            key_id: format!("{}-Key", name),
            key_group: None,
            bucket: None,
        })
        .collect()
}
