use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner on stderr while waiting on the network. Hidden when stderr is not a terminal.
pub fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("{spinner} {msg} ({elapsed})").expect("hardcoded"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
