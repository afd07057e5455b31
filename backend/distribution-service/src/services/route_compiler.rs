/// Route Compiler - path rules binding tiers to origins and signers
///
/// Produces one route per tier in ascending rank order, each carrying a
/// value copy of the tier's entitlement set, plus the default catch-all
/// route that serves unauthenticated traffic. The default route is always
/// first in emission order: the delivery network matches the most specific
/// pattern first and falls back to the catch-all.
use crate::error::{AppError, Result};
use crate::models::{DeliverySettings, EntitlementSet, OriginLocation, Route};
use crate::services::emitter::OriginLookup;
use crate::services::entitlement::EntitlementTable;
use crate::services::registry::TierRegistry;
use tracing::debug;

/// Path pattern for a tier's content
fn path_pattern(tier_id: &str) -> String {
    format!("{}/*", tier_id)
}

/// Compile the default route and one route per tier
///
/// Fails with `OriginNotFound` when a tier has no registered origin
/// location. Entitlement sets are copied into the routes at compile time;
/// re-resolving the table afterward cannot alter an already-compiled route.
pub fn compile(
    registry: &TierRegistry,
    entitlements: &EntitlementTable,
    origins: &dyn OriginLookup,
    default_origin: &OriginLocation,
    settings: &DeliverySettings,
) -> Result<(Route, Vec<Route>)> {
    let default_route = Route {
        tier_id: None,
        path_pattern: None,
        origin: default_origin.clone(),
        entitlements: EntitlementSet::default(),
        default_root_object: settings.default_root_object.clone(),
    };

    let mut routes = Vec::with_capacity(registry.len());
    for tier in registry.tiers() {
        let origin = origins.origin_for(&tier.id)?;
        // Fail closed: a tier missing from the table must never compile
        // into an unrestricted route.
        let entitlements = entitlements
            .get(&tier.id)
            .cloned()
            .ok_or_else(|| AppError::UnknownTier(tier.id.clone()))?;

        debug!(
            "Compiled route: pattern={}, origin={}, trusted_signers={}",
            path_pattern(&tier.id),
            origin.bucket,
            entitlements.len()
        );

        routes.push(Route {
            tier_id: Some(tier.id.clone()),
            path_pattern: Some(path_pattern(&tier.id)),
            origin,
            entitlements,
            default_root_object: None,
        });
    }

    Ok((default_route, routes))
}
