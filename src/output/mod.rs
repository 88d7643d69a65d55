//! Progress and summary output for CLI runs

pub mod console;
pub mod table;

pub use console::ConsoleReporter;

/// Run-scoped progress reporting, injected into the orchestrators.
///
/// Diagnostic detail goes to the `log` facade; this trait carries only the
/// user-facing progress display so tests can swap it out.
pub trait Reporter: Send + Sync {
    /// Start a progress section over `total` items
    fn begin(&self, label: &str, total: u64);

    /// Mark one item processed
    fn step(&self, item: &str);

    /// End the current progress section
    fn finish(&self);
}

/// Reporter that swallows all progress output
#[cfg(test)]
#[derive(Default)]
pub struct NullReporter;

#[cfg(test)]
impl Reporter for NullReporter {
    fn begin(&self, _label: &str, _total: u64) {}
    fn step(&self, _item: &str) {}
    fn finish(&self) {}
}
