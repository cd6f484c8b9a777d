use std::time::Instant;

use tracing::debug;

/// Runs `f` on the UI thread and logs how long it took. Loads and report
/// passes are short enough that the window stays responsive.
pub fn run_blocking<F, T>(label: &'static str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let started = Instant::now();
    let result = f();
    debug!(task = label, elapsed_ms = started.elapsed().as_millis() as u64, "finished");
    result
}
