//! Chromium driver over the Chrome `DevTools` Protocol.
//!
//! Every operation evaluates a small script built from the locator's query
//! expression, so elements are looked up afresh on each call and no remote
//! object handle is ever kept.

use crate::config::BrowserConfig;
use crate::driver::{Driver, ElementState, SelectOption};
use crate::locator::Locator;
use crate::result::{SuiteError, SuiteResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::fmt;
use tokio::sync::Mutex;
use tracing::debug;

/// Browser with a single page, driven through CDP
pub struct ChromiumDriver {
    browser: Mutex<CdpBrowser>,
    page: CdpPage,
    handle: tokio::task::JoinHandle<()>,
}

impl fmt::Debug for ChromiumDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromiumDriver").finish_non_exhaustive()
    }
}

fn launch_error(e: impl fmt::Display) -> SuiteError {
    SuiteError::BrowserLaunch {
        message: e.to_string(),
    }
}

fn driver_error(e: impl fmt::Display) -> SuiteError {
    SuiteError::driver(e.to_string())
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched
    pub async fn launch(config: &BrowserConfig) -> SuiteResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        for arg in &config.args {
            builder = builder.arg(arg.as_str());
        }

        let cdp_config = builder.build().map_err(launch_error)?;
        let (browser, mut handler) = CdpBrowser::launch(cdp_config)
            .await
            .map_err(launch_error)?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(launch_error)?;
        debug!(headless = config.headless, "chromium launched");

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handle,
        })
    }

    async fn eval<T: DeserializeOwned>(&self, script: &str) -> SuiteResult<T> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(driver_error)?;
        result.into_value().map_err(driver_error)
    }

    /// Run `body` against the `index`-th match; the body sees it as `el`
    async fn with_element(&self, locator: &Locator, index: usize, body: &str) -> SuiteResult<()> {
        let script = format!(
            "(() => {{ const el = {}; if (!el) return false; {body} return true; }})()",
            locator.to_query_nth(index)
        );
        if self.eval::<bool>(&script).await? {
            Ok(())
        } else {
            Err(SuiteError::StaleElement {
                locator: *locator,
                index,
            })
        }
    }
}

/// Script mapping every match to an [`ElementState`]
fn snapshot_script(locator: &Locator) -> String {
    format!(
        r"(() => {{
  return ({}).map((el, index) => {{
    const rect = el.getBoundingClientRect();
    const style = window.getComputedStyle(el);
    const visible = rect.width > 0 && rect.height > 0
      && style.visibility !== 'hidden' && style.display !== 'none';
    const isSelect = el.tagName === 'SELECT';
    return {{
      index,
      tag: el.tagName.toLowerCase(),
      input_type: el.tagName === 'INPUT' ? (el.type || null) : null,
      text: (el.innerText || el.textContent || '').trim(),
      value: typeof el.value === 'string' ? el.value : null,
      visible,
      enabled: !el.disabled,
      selected: !!(el.checked || el.selected),
      options: isSelect
        ? Array.from(el.options).map(o => ({{ text: o.text.trim(), value: o.value }}))
        : [],
    }};
  }});
}})()",
        locator.to_query_all()
    )
}

/// Attribute carried by nodes tagged with [`Driver::mark_rendered`]
const RENDER_MARK: &str = "data-cartwright-render";

/// Script body selecting an option of `el`; returns `'missing'` when absent
fn select_body(option: &SelectOption) -> String {
    let find = match option {
        SelectOption::Text(text) => {
            format!("Array.from(el.options).findIndex(o => o.text.trim() === {text:?})")
        }
        SelectOption::Value(value) => {
            format!("Array.from(el.options).findIndex(o => o.value === {value:?})")
        }
        SelectOption::Index(i) => format!("({i} < el.options.length ? {i} : -1)"),
    };
    format!(
        "const i = {find}; if (i < 0) return 'missing'; el.selectedIndex = i; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }}));"
    )
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> SuiteResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| SuiteError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> SuiteResult<String> {
        self.eval("location.href").await
    }

    async fn find_elements(&self, locator: &Locator) -> SuiteResult<Vec<ElementState>> {
        // a page mid-navigation has no execution context; report no matches
        match self.eval(&snapshot_script(locator)).await {
            Ok(elements) => Ok(elements),
            Err(err) => {
                debug!(%locator, error = %err, "probe failed");
                Ok(Vec::new())
            }
        }
    }

    async fn click(&self, locator: &Locator, index: usize) -> SuiteResult<()> {
        self.with_element(
            locator,
            index,
            "el.scrollIntoView({ block: 'center' }); el.click();",
        )
        .await
    }

    async fn clear(&self, locator: &Locator, index: usize) -> SuiteResult<()> {
        self.with_element(
            locator,
            index,
            "el.focus(); el.value = ''; el.dispatchEvent(new Event('input', { bubbles: true }));",
        )
        .await
    }

    async fn send_keys(&self, locator: &Locator, index: usize, text: &str) -> SuiteResult<()> {
        let body = format!(
            "el.focus(); el.value += {text:?}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }}));"
        );
        self.with_element(locator, index, &body).await
    }

    async fn select_option(
        &self,
        locator: &Locator,
        index: usize,
        option: &SelectOption,
    ) -> SuiteResult<()> {
        let script = format!(
            "(() => {{ const el = {}; if (!el) return 'stale'; {} return 'ok'; }})()",
            locator.to_query_nth(index),
            select_body(option)
        );
        match self.eval::<String>(&script).await?.as_str() {
            "ok" => Ok(()),
            "stale" => Err(SuiteError::StaleElement {
                locator: *locator,
                index,
            }),
            _ => Err(SuiteError::OptionNotFound {
                locator: *locator,
                option: option.to_string(),
            }),
        }
    }

    async fn attribute(
        &self,
        locator: &Locator,
        index: usize,
        name: &str,
    ) -> SuiteResult<Option<String>> {
        let script = format!(
            "(() => {{ const el = {}; if (!el) return {{ found: false }}; \
             return {{ found: true, value: el.getAttribute({name:?}) }}; }})()",
            locator.to_query_nth(index)
        );
        let result: serde_json::Value = self.eval(&script).await?;
        if result["found"].as_bool() != Some(true) {
            return Err(SuiteError::StaleElement {
                locator: *locator,
                index,
            });
        }
        Ok(result["value"].as_str().map(str::to_string))
    }

    async fn execute_script(&self, script: &str) -> SuiteResult<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(driver_error)?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn mark_rendered(&self, locator: &Locator) -> SuiteResult<usize> {
        let script = format!(
            "(() => {{ const els = {}; els.forEach(el => el.setAttribute('{RENDER_MARK}', '')); \
             return els.length; }})()",
            locator.to_query_all()
        );
        self.eval(&script).await
    }

    async fn count_marked(&self, locator: &Locator) -> SuiteResult<usize> {
        let script = format!(
            "({}).filter(el => el.hasAttribute('{RENDER_MARK}')).length",
            locator.to_query_all()
        );
        // mid-navigation the old document is still on its way out
        match self.eval(&script).await {
            Ok(count) => Ok(count),
            Err(err) => {
                debug!(%locator, error = %err, "marked probe failed");
                Ok(1)
            }
        }
    }

    async fn screenshot(&self) -> SuiteResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();

        let screenshot = self
            .page
            .execute(params)
            .await
            .map_err(|e| SuiteError::Screenshot {
                message: e.to_string(),
            })?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|e| SuiteError::Screenshot {
                message: e.to_string(),
            })
    }

    async fn quit(&self) -> SuiteResult<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.map_err(driver_error)?;
        let _ = browser.wait().await;
        self.handle.abort();
        Ok(())
    }
}
