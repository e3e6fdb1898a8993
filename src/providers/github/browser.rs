use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::handler::Handler;
use chromiumoxide::Page;
use futures::StreamExt;
use log::{debug, info, warn};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::BrowserConfig;
use crate::error::{ProwLinkError, Result};

use super::checks::STATUS_ACTIONS_SELECTOR;

/// Source of fully rendered pull request markup.
pub trait PageSource {
    /// Returns the page markup for `url` once its status checks have rendered.
    fn rendered_html(&self, url: &str) -> impl Future<Output = Result<String>>;
}

/// Renders pull request pages in a Chromium session driven over CDP.
///
/// Each call launches a fresh browser, waits for the status check anchors to
/// appear, captures the DOM, and shuts the browser down again. GitHub only
/// shows checks to signed-in users, so point `user_data_dir` at a profile
/// that is already logged in.
pub struct ChromiumPageSource {
    headless: bool,
    wait_timeout: Duration,
    poll_interval: Duration,
    chrome_executable: Option<PathBuf>,
    user_data_dir: Option<PathBuf>,
}

impl ChromiumPageSource {
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            headless: config.headless,
            wait_timeout: Duration::from_secs(config.wait_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            chrome_executable: config.chrome_executable.clone(),
            user_data_dir: config.user_data_dir.clone(),
        }
    }

    fn launch_config(&self) -> Result<LaunchConfig> {
        let mut builder = LaunchConfig::builder()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .window_size(1280, 900);

        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        if let Some(dir) = &self.user_data_dir {
            builder = builder.user_data_dir(dir);
        }

        builder
            .build()
            .map_err(|e| ProwLinkError::Browser(format!("Failed to build browser config: {e}")))
    }

    async fn capture(&self, browser: &Browser, url: &str) -> Result<String> {
        debug!("Navigating to {url}");
        let page = browser
            .new_page(url)
            .await
            .map_err(|e| ProwLinkError::Browser(format!("Navigation to '{url}' failed: {e}")))?;

        let ready = poll_until(self.wait_timeout, self.poll_interval, || {
            has_status_checks(&page)
        })
        .await;

        if !ready {
            return Err(ProwLinkError::PageNotReady {
                url: url.to_string(),
                waited: self.wait_timeout,
            });
        }

        page.content()
            .await
            .map_err(|e| ProwLinkError::Browser(format!("Failed to read page content: {e}")))
    }
}

impl PageSource for ChromiumPageSource {
    async fn rendered_html(&self, url: &str) -> Result<String> {
        info!("Launching Chromium to render {url}");

        let (mut browser, handler) = Browser::launch(self.launch_config()?)
            .await
            .map_err(|e| ProwLinkError::Browser(format!("Failed to launch browser: {e}")))?;
        let handler_task = spawn_handler(handler);

        let result = self.capture(&browser, url).await;

        if let Err(e) = browser.close().await {
            warn!("Error closing browser: {e}");
        }
        if let Err(e) = browser.wait().await {
            warn!("Error waiting for browser to exit: {e}");
        }
        handler_task.abort();

        let html = result?;
        debug!("Rendered markup for {url}:\n{html}");
        Ok(html)
    }
}

fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!("CDP handler error: {e}");
            }
        }
    })
}

async fn has_status_checks(page: &Page) -> bool {
    page.find_elements(STATUS_ACTIONS_SELECTOR)
        .await
        .map(|elements| !elements.is_empty())
        .unwrap_or(false)
}

/// Repeatedly runs `probe` until it reports success or `timeout` elapses.
///
/// The probe always runs at least once. Returns whether it succeeded.
async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut probe: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;

    loop {
        if probe().await {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_poll_until_ready_immediately() {
        let calls = Cell::new(0);
        let ready = poll_until(Duration::from_secs(5), Duration::from_millis(1), || {
            calls.set(calls.get() + 1);
            async { true }
        })
        .await;

        assert!(ready);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_poll_until_ready_after_retries() {
        let calls = Cell::new(0);
        let ready = poll_until(Duration::from_secs(5), Duration::from_millis(1), || {
            calls.set(calls.get() + 1);
            let done = calls.get() >= 3;
            async move { done }
        })
        .await;

        assert!(ready);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_poll_until_times_out() {
        let calls = Cell::new(0);
        let ready = poll_until(Duration::from_millis(20), Duration::from_millis(5), || {
            calls.set(calls.get() + 1);
            async { false }
        })
        .await;

        assert!(!ready);
        assert!(calls.get() >= 2);
    }

    #[tokio::test]
    async fn test_poll_until_zero_timeout_probes_once() {
        let calls = Cell::new(0);
        let ready = poll_until(Duration::ZERO, Duration::from_millis(5), || {
            calls.set(calls.get() + 1);
            async { false }
        })
        .await;

        assert!(!ready);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_page_source_from_config() {
        let config = BrowserConfig {
            headless: false,
            wait_timeout_secs: 7,
            poll_interval_ms: 0,
            chrome_executable: None,
            user_data_dir: Some(PathBuf::from("/tmp/profile")),
        };

        let source = ChromiumPageSource::new(&config);
        assert!(!source.headless);
        assert_eq!(source.wait_timeout, Duration::from_secs(7));
        assert_eq!(source.poll_interval, Duration::from_millis(1));
        assert_eq!(source.user_data_dir, Some(PathBuf::from("/tmp/profile")));
    }
}
