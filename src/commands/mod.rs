// ABOUTME: Command module aggregator for the stagehand CLI.
// ABOUTME: Re-exports the task runner and task listing.

mod list;
mod run;

pub use list::list_tasks;
pub use run::run_tasks;
