//! Authentication domain module.
//!
//! # Module Structure
//!
//! - `role`: closed set of user roles and their home routes
//! - `session`: local projection of the provider session and gate input state
//! - `route`: well-known routes and public-route checks
//! - `gate`: the navigation gate
//! - `provider`: identity provider trait and session events

mod gate;
mod provider;
mod role;
pub mod route;
mod session;

pub use gate::{AuthGate, GateDecision, GateState};
pub use provider::{IdentityProvider, SessionEvent, SessionLookup, SessionSubscription};
pub use role::Role;
pub use session::{AuthSession, AuthState, AuthUser};
