//! Core library components.
//!
//! Credential storage, requirement derivation, source resolution, and spawn
//! preparation. Nothing here touches the terminal.

pub mod bindings;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod domain;
pub mod draft;
pub mod injector;
pub mod modes;
pub mod probe;
pub mod profiles;
pub mod prompt;
pub mod requirements;
pub mod resolver;
pub mod spawn;
pub mod types;
pub mod validation;
