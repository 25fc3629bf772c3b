use std::fmt::Display;

/// Logging port used by the application layer.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);

    /// Reports a failed operation as `"{action} failed: {err}"`.
    fn failure(&self, action: &str, err: &dyn Display) {
        self.error(&format!("{} failed: {}", action, err));
    }
}
