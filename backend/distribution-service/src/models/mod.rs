use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A membership tier in the content hierarchy
///
/// Rank 0 is the least privileged tier. Ranks are contiguous and assigned
/// from insertion order when the registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: String,
    pub rank: usize,
    pub signer: SignerRef,
}

/// Opaque handle to a tier's verification key
///
/// The key material itself lives in an external key store; the compiler
/// only carries the public-key id and the trusted key-group name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerRef {
    pub key_id: String,
    pub key_group: String,
}

/// Content storage location backing one or more routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginLocation {
    pub bucket: String,
}

impl OriginLocation {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
        }
    }
}

/// One signer admitted to a tier's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedSigner {
    pub tier_id: String,
    pub rank: usize,
    pub signer: SignerRef,
}

/// The set of signers permitted to authenticate access to one tier's content
///
/// Members are held in ascending rank order so serialized signer lists are
/// reproducible across runs for auditing and diffing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementSet {
    members: Vec<TrustedSigner>,
}

impl EntitlementSet {
    /// Build a set from members, normalizing to ascending rank order
    pub fn from_members(mut members: Vec<TrustedSigner>) -> Self {
        members.sort_by_key(|m| m.rank);
        Self { members }
    }

    /// Members in ascending rank order
    pub fn members(&self) -> &[TrustedSigner] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check whether a tier's signer is admitted
    pub fn contains_tier(&self, tier_id: &str) -> bool {
        self.members.iter().any(|m| m.tier_id == tier_id)
    }
}

/// A path-matching rule binding content paths to an origin and its signers
///
/// The default route has no path pattern and an empty entitlement set; it
/// is the catch-all for unauthenticated traffic. Tier routes derive their
/// pattern from the tier identifier (`<tier>/*`). The entitlement set is
/// copied by value at compile time, never shared with the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub tier_id: Option<String>,
    pub path_pattern: Option<String>,
    pub origin: OriginLocation,
    pub entitlements: EntitlementSet,
    pub default_root_object: Option<String>,
}

impl Route {
    /// True for the unauthenticated catch-all route
    pub fn is_default(&self) -> bool {
        self.path_pattern.is_none()
    }
}

/// Override directive applied to an origin at its position in the origin list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum OriginOverride {
    /// Blank out the legacy origin-access identity
    DisableLegacyIdentity,
    /// Attach the externally provisioned origin-access-control id
    SetAccessControlId { id: String },
}

/// Positional association between an origin and its override directives
///
/// `index` must equal the origin's position in the emitted origin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginBinding {
    pub origin: OriginLocation,
    pub index: usize,
    pub overrides: Vec<OriginOverride>,
}

/// Cache policy parameters for the distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicyConfig {
    pub min_ttl_seconds: u64,
    pub default_ttl_seconds: u64,
    pub max_ttl_seconds: u64,
    pub enable_gzip: bool,
}

impl Default for CachePolicyConfig {
    fn default() -> Self {
        Self {
            min_ttl_seconds: 1,
            default_ttl_seconds: 3600,
            max_ttl_seconds: 31_536_000,
            enable_gzip: true,
        }
    }
}

/// What the origin request carries through from the viewer request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginRequestPolicyConfig {
    pub forward_cookies: bool,
    pub forward_headers: bool,
    pub forward_query_strings: bool,
}

/// Viewer-facing protocol requirement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerProtocolPolicy {
    HttpsOnly,
    #[default]
    RedirectToHttps,
}

impl ViewerProtocolPolicy {
    /// Lenient config parser; unrecognized values fall back to the default
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "https-only" | "https_only" | "httpsonly" => Self::HttpsOnly,
            _ => Self::RedirectToHttps,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HttpsOnly => "https-only",
            Self::RedirectToHttps => "redirect-to-https",
        }
    }
}

/// Edge-location coverage class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceClass {
    Price100,
    #[default]
    Price200,
    PriceAll,
}

impl PriceClass {
    /// Lenient config parser; unrecognized values fall back to the default
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "100" | "priceclass_100" | "price100" => Self::Price100,
            "all" | "priceclass_all" | "priceall" => Self::PriceAll,
            _ => Self::Price200,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Price100 => "PriceClass_100",
            Self::Price200 => "PriceClass_200",
            Self::PriceAll => "PriceClass_All",
        }
    }
}

/// HTTP version offered to viewers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpVersion {
    Http1,
    #[default]
    Http2,
}

impl HttpVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http1 => "http1.1",
            Self::Http2 => "http2",
        }
    }
}

/// Access-log destination for the distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogConfig {
    pub bucket: String,
    pub prefix: String,
}

/// Distribution-wide delivery settings carried verbatim into the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySettings {
    pub comment: String,
    pub enabled: bool,
    pub http_version: HttpVersion,
    pub price_class: PriceClass,
    pub viewer_protocol: ViewerProtocolPolicy,
    pub default_root_object: Option<String>,
    pub cache_policy: CachePolicyConfig,
    pub origin_request_policy: OriginRequestPolicyConfig,
    pub access_log: Option<AccessLogConfig>,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            comment: String::new(),
            enabled: true,
            http_version: HttpVersion::default(),
            price_class: PriceClass::default(),
            viewer_protocol: ViewerProtocolPolicy::default(),
            default_root_object: Some("index.html".to_string()),
            cache_policy: CachePolicyConfig::default(),
            origin_request_policy: OriginRequestPolicyConfig::default(),
            access_log: None,
        }
    }
}

/// Opaque reference to an external firewall/geo policy
///
/// The compiler carries the reference without inspecting the policy rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRef {
    pub arn: String,
}

/// Identifiers returned by the delivery-network layer after emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionHandle {
    pub distribution_id: String,
    pub domain_name: String,
    pub created_at: DateTime<Utc>,
}

/// The aggregate compilation output
///
/// Built once per run from a registry snapshot, validated, then handed
/// read-only to the emission interface. Never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionPlan {
    pub plan_id: Uuid,
    pub compiled_at: DateTime<Utc>,
    pub default_route: Route,
    pub routes: Vec<Route>,
    pub origins: Vec<OriginBinding>,
    pub policy: Option<PolicyRef>,
    pub settings: DeliverySettings,
}
