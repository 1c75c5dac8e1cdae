use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while the explorer is being called.
pub struct ApiProgress {
    bar: ProgressBar,
}

impl ApiProgress {
    fn spinner(template: &str, message: &str, tick: Duration) -> Self {
        let style = ProgressStyle::default_spinner()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(tick);

        Self { bar }
    }

    pub fn new_lookup() -> Self {
        Self::spinner(
            "🔎 {msg} {spinner:.yellow}",
            "Checking whether the contract is already verified...",
            Duration::from_millis(120),
        )
    }

    pub fn new_submission() -> Self {
        Self::spinner(
            "🚀 {msg} {spinner:.green}",
            "Submitting verification request...",
            Duration::from_millis(80),
        )
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
