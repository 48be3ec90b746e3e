//! # Edulink
//!
//! Client core and terminal front end for a multi-role school management service.
//!
//! ## Overview
//!
//! Students, teachers and parents create accounts through a role-conditional registration form;
//! schools register through a three-step wizard that also creates their administrator. Accounts
//! and school records live in a hosted auth/database service; the signed-up user's profile is
//! kept on the device and can be viewed and edited offline. The school's student roster is read
//! from the same service.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── cli/              # clap subcommands and dialoguer prompts
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Account registration and sign-in forms
//! │   ├── schools/     # School registration wizard
//! │   ├── profile/     # Profile view and editor
//! │   └── students/    # Student roster and student profiles
//! ├── logging.rs        # Tracing subscriber setup
//! ├── router.rs         # Routes and notices returned by form submits
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Validated form values
//! crates/
//! ├── edulink-core/     # Errors and validation rules
//! ├── edulink-config/   # Environment configuration
//! ├── edulink-models/   # Form schemas and records
//! ├── edulink-storage/  # Local key-value storage and the profile store
//! └── edulink-gateway/  # Auth/persistence backend client
//! ```
//!
//! Each feature module follows the same structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: Form state and submit handling
//! - `service.rs`: Calls to the gateway and the profile store
//!
//! ## Submitting a form
//!
//! 1. The form builds its input and validates it: per-field checks first, then cross-field
//!    refinements (password confirmation, parent → registered student).
//! 2. Validation failures are recorded per field; nothing is sent.
//! 3. The service calls the gateway, then writes through to local storage.
//! 4. The submit returns a notice and the route to move to.
//!
//! ## Quick Start
//!
//! ```bash
//! SUPABASE_URL=https://your-project.supabase.co
//! SUPABASE_ANON_KEY=your-anon-key
//! EDULINK_DATA_DIR=.edulink
//! ```
//!
//! ```bash
//! cargo run -- register --role parent
//! cargo run -- register-school
//! cargo run -- login
//! cargo run -- profile show
//! cargo run -- students list
//! cargo run -- students show 12
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Terminal front end
//! - [`logging`]: Tracing setup
//! - [`modules`]: Feature modules (auth, schools, profile, students)
//! - [`router`]: Routes, notices and submit outcomes
//! - [`state`]: Shared application state
//! - [`validator`]: Validated form values

pub mod cli;
pub mod logging;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use edulink_config;
pub use edulink_core;
pub use edulink_gateway;
pub use edulink_models;
pub use edulink_storage;
