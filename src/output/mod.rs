mod progress;
mod styling;

pub use progress::StageProgress;
use styling::{dim, magenta_bold};

/// Prints the `prowlink` banner to stderr.
///
/// Stdout is reserved for the resolved namespace so the tool can be piped.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🔗 prowlink"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("PR to Prow e2e cluster resolver")
    );
}
