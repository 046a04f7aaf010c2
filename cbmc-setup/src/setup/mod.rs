//! Project Setup
//!
//! One-time project installation and per-function proof instantiation.

pub mod roots;
pub mod installer;
pub mod placeholder;
pub mod instantiator;

pub use roots::RootSet;
pub use installer::{Installer, DEFINES_FILE};
pub use placeholder::Substitutions;
pub use instantiator::{Instantiator, ProofOutcome, ProofRequest};
