//! Crewtrack Policy - the authorization decision function
//!
//! One pure function decides who may do what: [`Policy::capabilities_for`]
//! maps an (actor, project) pair to the set of capabilities the actor
//! holds on that project. Upstream, permission rules had drifted apart
//! across independently-written views; this crate is the single source of
//! truth every caller shares.
//!
//! Decisions depend only on the actor's role/identity and the project's
//! ownership/membership. Task content is never consulted; task
//! self-service (accept/reject/complete) is granted by the lifecycle
//! crate, not by a capability.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod capability;
pub mod policy;

pub use capability::{Capability, CapabilitySet};
pub use policy::{ManagerScope, Policy};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
