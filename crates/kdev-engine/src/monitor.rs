//! Polling monitor
//!
//! Prints pods, node usage and recent events every interval until the stop
//! signal is raised or the optional iteration bound is reached.

use kdev_core::errors::Result;
use kdev_core::report::Reporter;
use kdev_core::runtime::{ClusterRuntime, RuntimeCall};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    raised: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Sleep up to `duration`, waking early when raised; returns `true` if raised
    ///
    /// A duration past the clock's range sleeps until raised.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now().checked_add(duration);
        while !self.is_raised() {
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    SLEEP_SLICE.min(deadline - now)
                }
                None => SLEEP_SLICE,
            };
            std::thread::sleep(slice);
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorOptions {
    pub namespace: String,
    pub interval: Duration,
    pub max_iterations: Option<u64>,
}

fn snapshot_calls(namespace: &str) -> [(&'static str, RuntimeCall); 3] {
    [
        (
            "Pods",
            RuntimeCall::kubectl(["get", "pods", "-n", namespace, "-o", "wide"]),
        ),
        ("Node usage", RuntimeCall::kubectl(["top", "nodes"])),
        (
            "Recent events",
            RuntimeCall::kubectl([
                "get",
                "events",
                "-n",
                namespace,
                "--sort-by=.lastTimestamp",
            ]),
        ),
    ]
}

/// Run the polling loop; returns the number of completed iterations
///
/// # Errors
///
/// None at present: query failures (e.g. no metrics-server for `top`) are
/// shown as warnings and the loop continues.
pub fn run_monitor(
    runtime: &dyn ClusterRuntime,
    reporter: &dyn Reporter,
    options: &MonitorOptions,
    stop: &StopSignal,
) -> Result<u64> {
    let mut iterations = 0;
    reporter.info(&format!(
        "Monitoring namespace {} every {}s (enter 'q' to stop)",
        options.namespace,
        options.interval.as_secs()
    ));

    while !stop.is_raised() {
        if options.max_iterations.is_some_and(|max| iterations >= max) {
            break;
        }
        reporter.raw(&format!(
            "=== {} | namespace {} ===",
            chrono::Local::now().format("%H:%M:%S"),
            options.namespace
        ));
        for (title, call) in snapshot_calls(&options.namespace) {
            match runtime.run(&call) {
                Ok(output) => reporter.raw(&format!("--- {} ---\n{}", title, output.trim_end())),
                Err(e) => reporter.warn(&format!("{}: {}", title, e)),
            }
        }
        iterations += 1;

        let bound_reached = options.max_iterations.is_some_and(|max| iterations >= max);
        if bound_reached || stop.sleep(options.interval) {
            break;
        }
    }

    reporter.success(&format!("Monitoring stopped after {} iteration(s)", iterations));
    Ok(iterations)
}
