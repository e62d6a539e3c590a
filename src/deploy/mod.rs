// ABOUTME: Deployment sequencing: operations, their remote steps, and task planning.
// ABOUTME: Exports the Deployer and the CLI task plan resolver.

mod deployer;
mod operation;
mod plan;
pub mod steps;

pub use deployer::{Deployer, confirm_deploy};
pub use operation::Operation;
pub use plan::{Stage, Task, TaskPlan};
