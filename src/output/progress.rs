use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_red, bright_yellow};

/// Spinner for one pipeline stage, drawn to stderr.
///
/// A stage dropped without [`StageProgress::finish`] is marked as failed,
/// so `?` on an error leaves a red line behind.
pub struct StageProgress {
    pb: ProgressBar,
    label: String,
}

impl StageProgress {
    pub fn header() {
        eprintln!("{}  {}", bright("⚙️"), bright("Stages").underlined());
    }

    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        let pb = create_spinner(bright_yellow(&label).to_string());
        Self { pb, label }
    }

    pub fn finish(self, detail: impl std::fmt::Display) {
        self.pb.finish_with_message(
            bright_green(format!("{}: {detail} ✓", self.label)).to_string(),
        );
    }
}

impl Drop for StageProgress {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb
                .abandon_with_message(bright_red(format!("{} ✗", self.label)).to_string());
        }
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
