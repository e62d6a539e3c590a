// ABOUTME: Remote commands and sync requests for each deployment step.
// ABOUTME: Pure functions of the deployment context, so they can be rendered without connecting.

use crate::context::DeploymentContext;
use crate::remote::RemoteCommand;
use crate::sync::{ExcludeSet, SyncRequest};
use crate::types::RemotePath;

/// Flags for `virtualenv`: wipe any existing environment, isolated package directory.
pub const VIRTUALENV_FLAGS: [&str; 2] = ["--clear", "--distribute"];

/// Supervisor config shipped with the code, relative to the code root.
pub const SUPERVISOR_CONFIG: &str = "./configs/_supervisord.conf";

pub const SUPERVISOR_CONFIG_TARGET: &str = "/etc/supervisord.conf";

/// Directory under the code root holding the requirements manifest.
pub const REQUIREMENTS_DIR: &str = "configs";

pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Directory timestamps differ on every checkout and would trigger needless re-syncs.
pub const OMIT_DIR_TIMES: &str = "--omit-dir-times";

pub fn make_dir(path: &RemotePath) -> RemoteCommand {
    RemoteCommand::new("mkdir").arg("-p").arg(path.as_str())
}

pub fn create_virtualenv(ctx: &DeploymentContext) -> RemoteCommand {
    RemoteCommand::new("virtualenv")
        .args(VIRTUALENV_FLAGS)
        .arg(ctx.virtualenv_root().as_str())
}

pub fn sync_code(ctx: &DeploymentContext) -> SyncRequest {
    SyncRequest {
        local_dir: ctx.local_dir().to_path_buf(),
        remote_dir: ctx.root().clone(),
        excludes: ExcludeSet::default(),
        delete: false,
        extra_opts: vec![OMIT_DIR_TIMES.to_string()],
    }
}

pub fn install_supervisor_config(ctx: &DeploymentContext) -> RemoteCommand {
    RemoteCommand::new("cp")
        .arg(SUPERVISOR_CONFIG)
        .arg(SUPERVISOR_CONFIG_TARGET)
        .current_dir(ctx.code_root())
        .sudo()
}

pub fn install_requirements(ctx: &DeploymentContext) -> RemoteCommand {
    let requirements_dir = ctx.code_root().join(REQUIREMENTS_DIR);
    RemoteCommand::new("pip")
        .arg("install")
        .arg("-E")
        .arg(ctx.virtualenv_root().as_str())
        .arg("--requirement")
        .arg(requirements_dir.join(REQUIREMENTS_FILE).as_str())
        .current_dir(&requirements_dir)
}
