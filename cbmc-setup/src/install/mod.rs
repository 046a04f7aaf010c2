//! Template Installation
//!
//! Copy-or-link installation of template files into a destination tree.

pub mod policy;
pub mod primitive;
pub mod tree;

pub use policy::{InstallMethod, InstallPolicy, COPY_INSTEAD};
pub use primitive::{install_file, InstallOutcome, InstallStatus};
pub use tree::{copy_directory_contents, files_under_root, InstallFailure, InstallReport};
