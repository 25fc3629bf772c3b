use business::domain::logger::Logger;
use tracing::{debug, error, info, warn};

/// `Logger` backed by `tracing`. Every event carries the `component` that
/// emitted it, so the REST API and the CLI can share one subscriber format.
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    component: &'static str,
}

impl TracingLogger {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("assistant")
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "assistant", component = self.component, "{}", message);
    }
    fn warn(&self, message: &str) {
        warn!(target: "assistant", component = self.component, "{}", message);
    }
    fn error(&self, message: &str) {
        error!(target: "assistant", component = self.component, "{}", message);
    }
    fn debug(&self, message: &str) {
        debug!(target: "assistant", component = self.component, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_assistant_component() {
        assert_eq!(TracingLogger::default().component(), "assistant");
        assert_eq!(TracingLogger::new("ask").component(), "ask");
    }

    #[test]
    fn should_log_without_installed_subscriber() {
        let logger: &dyn Logger = &TracingLogger::new("test");

        logger.info("info");
        logger.failure("Connect", &"refused");
    }
}
