use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Upper bound for a single step; exceeding it is reported as a step failure.
    pub step_timeout: Duration,
    pub agent_max_turns: usize,
    pub browser_timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            step_timeout: Duration::from_secs(300),
            agent_max_turns: 8,
            browser_timeout: Duration::from_secs(30),
        }
    }
}
