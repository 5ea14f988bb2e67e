//! Browser session shared by every page object of a run.

use crate::actions::Actions;
use crate::config::SuiteConfig;
use crate::driver::Driver;
use crate::result::SuiteResult;
use crate::wait::WaitPolicy;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exclusively owned browser handle plus the run's base URL and wait policy
///
/// Page objects borrow the session for their whole lifetime, so no page can
/// outlive the browser it drives.
pub struct Session {
    driver: Box<dyn Driver>,
    base_url: String,
    policy: WaitPolicy,
    screenshot_dir: PathBuf,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("policy", &self.policy)
            .field("screenshot_dir", &self.screenshot_dir)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Wrap an already started driver
    #[must_use]
    pub fn new(driver: Box<dyn Driver>, config: &SuiteConfig) -> Self {
        let mut base_url = config.base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            driver,
            base_url,
            policy: config.wait,
            screenshot_dir: config.screenshot_dir.clone(),
        }
    }

    /// Launch Chromium and open a session on it
    #[cfg(feature = "browser")]
    pub async fn launch(config: &SuiteConfig) -> SuiteResult<Self> {
        let driver = crate::browser::ChromiumDriver::launch(&config.browser).await?;
        Ok(Self::new(Box::new(driver), config))
    }

    /// Underlying driver
    #[must_use]
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Default wait policy
    #[must_use]
    pub const fn policy(&self) -> WaitPolicy {
        self.policy
    }

    /// Storefront root, always ending in `/`
    #[must_use]
    pub fn home_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a storefront path
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Directory failure screenshots are written to
    #[must_use]
    pub fn screenshot_dir(&self) -> &Path {
        &self.screenshot_dir
    }

    /// Action layer bound to the session's default policy
    #[must_use]
    pub fn actions(&self) -> Actions<'_> {
        Actions::new(self.driver.as_ref(), self.policy)
    }

    /// Navigate to an absolute URL
    pub async fn navigate(&self, url: &str) -> SuiteResult<()> {
        debug!(url, "navigate");
        self.driver.navigate(url).await
    }

    /// Navigate to a storefront path
    pub async fn open(&self, path: &str) -> SuiteResult<()> {
        self.navigate(&self.url_for(path)).await
    }

    /// Current browser URL
    pub async fn current_url(&self) -> SuiteResult<String> {
        self.driver.current_url().await
    }

    /// Write a PNG of the viewport to `<screenshot_dir>/<name>.png`
    pub async fn save_screenshot(&self, name: &str) -> SuiteResult<PathBuf> {
        let png = self.driver.screenshot().await?;
        tokio::fs::create_dir_all(&self.screenshot_dir).await?;
        let path = self.screenshot_dir.join(format!("{}.png", file_stem(name)));
        tokio::fs::write(&path, png).await?;
        Ok(path)
    }

    /// Close the browser
    pub async fn close(self) -> SuiteResult<()> {
        self.driver.quit().await
    }
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
