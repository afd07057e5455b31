/// Distribution plan assembly and the one-shot compilation driver
///
/// Assembly validates everything positional before the plan leaves the
/// compiler: exactly one catch-all route, one tier route per registry tier
/// in rank order, binding indices forming a contiguous permutation, and
/// binding origins matching route origins slot for slot. Any violation
/// aborts the run; no partial plan is ever handed to the emitter.
use crate::error::{AppError, Result};
use crate::models::{
    DeliverySettings, DistributionPlan, OriginBinding, OriginLocation, PolicyRef, Route,
};
use crate::services::emitter::OriginLookup;
use crate::services::registry::TierRegistry;
use crate::services::{entitlement, origin_planner, route_compiler};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// Compilation run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerState {
    /// No work started
    Empty,
    /// Entitlements, routes, and bindings being derived
    Resolving,
    /// Plan assembled and validated
    Planned,
}

impl CompilerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Resolving => "resolving",
            Self::Planned => "planned",
        }
    }
}

/// Validate and assemble the aggregate plan
pub fn assemble(
    registry: &TierRegistry,
    default_route: Route,
    tier_routes: Vec<Route>,
    origin_bindings: Vec<OriginBinding>,
    policy: Option<PolicyRef>,
    settings: DeliverySettings,
) -> Result<DistributionPlan> {
    if !default_route.is_default() {
        return Err(AppError::PlanInconsistency(
            "default route must not carry a path pattern".to_string(),
        ));
    }
    if !default_route.entitlements.is_empty() {
        return Err(AppError::PlanInconsistency(
            "default route must not require entitlements".to_string(),
        ));
    }

    if tier_routes.len() != registry.len() {
        return Err(AppError::PlanInconsistency(format!(
            "expected {} tier routes, got {}",
            registry.len(),
            tier_routes.len()
        )));
    }
    for (slot, (route, tier)) in tier_routes.iter().zip(registry.tiers()).enumerate() {
        if route.is_default() {
            return Err(AppError::PlanInconsistency(format!(
                "tier route at slot {} has no path pattern",
                slot
            )));
        }
        if route.tier_id.as_deref() != Some(tier.id.as_str()) {
            return Err(AppError::PlanInconsistency(format!(
                "tier route at slot {} is out of rank order",
                slot
            )));
        }
    }

    let expected_origins = registry.len() + 1;
    if origin_bindings.len() != expected_origins {
        return Err(AppError::PlanInconsistency(format!(
            "expected {} origin bindings, got {}",
            expected_origins,
            origin_bindings.len()
        )));
    }
    // Indices must be exactly 0..N-1 in emission order; anything else means
    // overrides would land on the wrong origin downstream.
    for (position, binding) in origin_bindings.iter().enumerate() {
        if binding.index != position {
            return Err(AppError::PlanInconsistency(format!(
                "origin binding at position {} carries index {}",
                position, binding.index
            )));
        }
    }

    if origin_bindings[0].origin != default_route.origin {
        return Err(AppError::PlanInconsistency(
            "origin binding 0 does not match the default route origin".to_string(),
        ));
    }
    for (slot, route) in tier_routes.iter().enumerate() {
        if origin_bindings[slot + 1].origin != route.origin {
            return Err(AppError::PlanInconsistency(format!(
                "origin binding {} does not match its route origin",
                slot + 1
            )));
        }
    }

    Ok(DistributionPlan {
        plan_id: Uuid::new_v4(),
        compiled_at: Utc::now(),
        default_route,
        routes: tier_routes,
        origins: origin_bindings,
        policy,
        settings,
    })
}

/// One-shot driver for a compilation run
///
/// A compiler instance runs exactly once over one registry snapshot. There
/// are no retry semantics: a failed run stays failed, and a new run starts
/// from a fresh compiler and a fresh snapshot.
pub struct DistributionCompiler {
    state: CompilerState,
    settings: DeliverySettings,
    default_origin: OriginLocation,
    access_control_id: String,
    policy: Option<PolicyRef>,
}

impl DistributionCompiler {
    pub fn new(
        settings: DeliverySettings,
        default_origin: OriginLocation,
        access_control_id: String,
        policy: Option<PolicyRef>,
    ) -> Self {
        Self {
            state: CompilerState::Empty,
            settings,
            default_origin,
            access_control_id,
            policy,
        }
    }

    pub fn state(&self) -> CompilerState {
        self.state
    }

    /// Compile a distribution plan from a registry snapshot
    pub fn compile(
        &mut self,
        registry: &TierRegistry,
        origins: &dyn OriginLookup,
    ) -> Result<DistributionPlan> {
        if self.state != CompilerState::Empty {
            return Err(AppError::PlanInconsistency(format!(
                "compilation already started (state: {})",
                self.state.as_str()
            )));
        }

        self.state = CompilerState::Resolving;
        debug!("Compiler state: {}", self.state.as_str());

        let entitlements = entitlement::resolve(registry);
        let (default_route, tier_routes) = route_compiler::compile(
            registry,
            &entitlements,
            origins,
            &self.default_origin,
            &self.settings,
        )?;
        let bindings = origin_planner::plan(
            registry,
            origins,
            &self.default_origin,
            &self.access_control_id,
        )?;

        let plan = assemble(
            registry,
            default_route,
            tier_routes,
            bindings,
            self.policy.clone(),
            self.settings.clone(),
        )?;

        self.state = CompilerState::Planned;
        info!(
            "Distribution plan compiled: {} tier routes, {} origins",
            plan.routes.len(),
            plan.origins.len()
        );

        Ok(plan)
    }
}
