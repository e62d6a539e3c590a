// ABOUTME: Validated domain types shared across modules.
// ABOUTME: Project identifiers and remote POSIX paths.

mod project_name;
mod remote_path;

pub use project_name::{ProjectName, ProjectNameError};
pub use remote_path::RemotePath;
