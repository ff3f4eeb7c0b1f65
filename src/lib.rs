//! Sesame - credential resolution for coding-agent sessions.
//!
//! Given a provider profile and a target machine, decides which source
//! supplies every API key the agent needs and builds the environment for
//! the launch.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── secret        # Saved credential CRUD
//! │   ├── profile       # Profile catalogue
//! │   ├── bind          # Default bindings
//! │   ├── check         # Satisfaction report
//! │   ├── spawn         # Resolve, prompt, and launch
//! │   ├── resolve       # Interactive resolution prompt
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── domain/       # Plain data types
//!     ├── config        # settings.toml management
//!     ├── credentials   # Saved credential store
//!     ├── bindings      # Default bindings, selections, session values
//!     ├── requirements  # Profile -> requirement derivation
//!     ├── resolver      # Source precedence rules
//!     ├── injector      # Spawn environment overlay
//!     ├── probe         # Machine environment presence cache
//!     ├── prompt        # Auto-prompt controller
//!     ├── modes         # Per-agent permission and model modes
//!     ├── draft         # New-session draft (age-encrypted at rest)
//!     ├── cipher/       # Encryption backends
//!     └── spawn         # Spawn request and spawners
//! ```
//!
//! # Source precedence
//!
//! For each secret a profile requires, the first matching source wins:
//! a value typed for this launch, an explicitly selected saved credential,
//! the profile's default binding, then the machine's own environment.

pub mod cli;
pub mod core;
pub mod error;
