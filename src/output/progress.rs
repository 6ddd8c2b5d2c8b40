//! Progress spinners for network calls

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner on stderr while `message` is in progress.
///
/// Hidden when `visible` is false so JSON output stays clean.
pub fn spinner(message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
