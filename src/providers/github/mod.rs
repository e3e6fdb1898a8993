mod browser;
mod checks;

pub use browser::{ChromiumPageSource, PageSource};
pub use checks::{extract_check_links, select_e2e_link};
