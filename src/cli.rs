use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::providers::github::ChromiumPageSource;
use crate::providers::prow::ProwClient;
use crate::resolver::ClusterResolver;

#[derive(Parser)]
#[command(name = "prowlink")]
#[command(
    author,
    version,
    about = "Find the test cluster namespace of a pull request's e2e job",
    long_about = None
)]
pub struct Cli {
    /// Pull request URL, or an e2e check link into Prow
    #[arg(short, long)]
    url: String,

    /// Container whose log announces the namespace [default: test]
    #[arg(short, long, env = "PROWLINK_CONTAINER")]
    container: Option<String>,

    /// Prow deck base URL [default: https://prow.ci.openshift.org]
    #[arg(long, env = "PROWLINK_PROW_URL")]
    prow_url: Option<String>,

    /// Seconds to wait for status checks to render [default: 60]
    #[arg(long)]
    wait_timeout: Option<u64>,

    /// Show the browser window instead of running headless
    #[arg(long, default_value_t = false)]
    headed: bool,

    /// Chromium profile directory to reuse, e.g. one logged in to GitHub
    #[arg(long, env = "PROWLINK_USER_DATA_DIR")]
    user_data_dir: Option<PathBuf>,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(short, long, default_value_t = false)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Namespace only
    Plain,
    /// Full resolution record
    Json,
}

impl Cli {
    /// Loads the configuration file and layers command-line overrides on top.
    fn config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(container) = &self.container {
            config.prow.container.clone_from(container);
        }
        if let Some(prow_url) = &self.prow_url {
            config.prow.base_url.clone_from(prow_url);
        }
        if let Some(wait_timeout) = self.wait_timeout {
            config.browser.wait_timeout_secs = wait_timeout;
        }
        if self.headed {
            config.browser.headless = false;
        }
        if let Some(dir) = &self.user_data_dir {
            config.browser.user_data_dir = Some(dir.clone());
        }

        Ok(config)
    }

    pub async fn execute(&self) -> Result<()> {
        let config = self.config()?;
        info!(
            "Using Prow at {} with container '{}'",
            config.prow.base_url, config.prow.container
        );

        let prow = ProwClient::new(
            &config.prow.base_url,
            config.prow.request_timeout_secs.map(Duration::from_secs),
        )?;
        let pages = ChromiumPageSource::new(&config.browser);
        let resolver = ClusterResolver::new(pages, prow, config.prow.container);

        let resolution = resolver
            .resolve(&self.url)
            .await
            .with_context(|| format!("Failed to resolve cluster for {}", self.url))?;

        match self.format {
            OutputFormat::Plain => println!("{}", resolution.namespace),
            OutputFormat::Json if self.pretty => {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            }
            OutputFormat::Json => println!("{}", serde_json::to_string(&resolution)?),
        }

        Ok(())
    }
}
