pub mod emitter;
pub mod entitlement;
pub mod origin_planner;
pub mod plan;
pub mod registry;
pub mod route_compiler;

// Re-export commonly used types
pub use emitter::{
    DistributionEmitter, JsonFileEmitter, OriginLookup, SignerLookup, StaticOriginLookup,
    StaticSignerLookup,
};
pub use entitlement::EntitlementTable;
pub use plan::{CompilerState, DistributionCompiler};
pub use registry::TierRegistry;
