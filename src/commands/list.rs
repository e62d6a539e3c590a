// ABOUTME: Task listing for --list.
// ABOUTME: Prints every task name with its one-line description.

use stagehand::deploy::Task;

pub fn list_tasks() {
    let width = Task::all().map(|t| t.name().len()).max().unwrap_or(0);
    println!("Available tasks:\n");
    for task in Task::all() {
        println!("    {:width$}  {}", task.name(), task.description());
    }
}
