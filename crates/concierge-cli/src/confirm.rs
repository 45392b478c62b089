use concierge::agent::Confirmer;
use concierge::models::task::Task;

/// Asks on the terminal before a task runs. Anything but an explicit yes declines.
pub struct CliclackConfirmer;

impl Confirmer for CliclackConfirmer {
    fn confirm(&self, task: &Task) -> bool {
        cliclack::confirm(describe(task))
            .initial_value(true)
            .interact()
            .unwrap_or(false)
    }
}

pub fn describe(task: &Task) -> String {
    if task.parameters.is_empty() {
        format!("Run the {} task?", task.task_type)
    } else {
        let parameters = serde_json::to_string(&task.parameters).unwrap_or_default();
        format!("Run the {} task with {}?", task.task_type, parameters)
    }
}
