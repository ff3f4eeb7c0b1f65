//! Domain types.

mod agent;
mod credential;
pub mod identity;
mod profile;
mod requirement;
mod resolution;
mod satisfaction;

pub use agent::AgentKind;
pub use credential::SavedCredential;
pub use identity::Identity;
pub use profile::{EnvVarDecl, Profile};
pub use requirement::{CredentialRequirement, RequirementKind};
pub use resolution::ResolutionAction;
pub use satisfaction::{SatisfactionItem, SatisfactionResult, SatisfiedBy};
