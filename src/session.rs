//! Browser session lifecycle (one Chrome process + one tab per request)

use crate::{Error, PipelineConfig, Result, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use headless_chrome::browser::tab::Tab;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, warn};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

/// Handle to one isolated rendering session: a headless Chrome process plus
/// one tab configured with the fixed 1920x1080 viewport at device scale
/// factor 1.
///
/// The session is owned exclusively by one deck request and must never be
/// shared across requests. Dropping the handle terminates the Chrome process,
/// so teardown happens on every exit path; [`RenderSession::close`] releases
/// it explicitly and is idempotent, including on a handle whose tab setup
/// never completed.
pub struct RenderSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
}

impl RenderSession {
    /// Launch a Chrome process and configure its tab for deterministic
    /// capture. This is the most expensive and most failure-prone step of a
    /// request (missing binary, sandbox restrictions, out of memory), and
    /// every failure here surfaces as [`Error::BrowserLaunch`].
    pub fn acquire(config: &PipelineConfig) -> Result<Self> {
        // The scale factor is forced rather than left to the device default:
        // captured pixels must match the declared PDF geometry 1:1. The sRGB
        // profile keeps repeat runs of the same deck visually identical.
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((VIEWPORT_WIDTH, VIEWPORT_HEIGHT)))
            .args(vec![
                OsStr::new("--force-device-scale-factor=1"),
                OsStr::new("--force-color-profile=srgb"),
                OsStr::new("--hide-scrollbars"),
            ])
            .build()
            .map_err(|e| Error::BrowserLaunch(format!("failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::BrowserLaunch(format!("failed to launch browser: {}", e)))?;

        let tab = match browser.new_tab() {
            Ok(tab) => tab,
            Err(e) => {
                // Partially-initialized session: drop the browser so the
                // child process does not outlive the failed acquire.
                drop(browser);
                return Err(Error::BrowserLaunch(format!("failed to create tab: {}", e)));
            }
        };

        // Bound every subsequent wait on this tab by the per-slide timeout.
        tab.set_default_timeout(Duration::from_millis(config.load_timeout_ms));

        debug!(
            "session acquired: viewport {}x{}, load timeout {}ms",
            VIEWPORT_WIDTH, VIEWPORT_HEIGHT, config.load_timeout_ms
        );

        Ok(Self {
            browser: Some(browser),
            tab: Some(tab),
        })
    }

    /// The session's single tab.
    ///
    /// Fails only after [`close`](Self::close) has run; live sessions always
    /// hold a tab.
    pub fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| Error::Other("session already released".to_string()))
    }

    /// Release the session and terminate the Chrome process. Idempotent.
    pub fn close(&mut self) {
        if let Some(tab) = self.tab.take() {
            drop(tab);
        }
        if let Some(browser) = self.browser.take() {
            // Dropping the Browser kills the child process and reaps it.
            drop(browser);
            debug!("session released");
        }
    }

    fn is_closed(&self) -> bool {
        self.browser.is_none()
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        if !self.is_closed() {
            warn!("session dropped without explicit release; closing now");
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_acquire_and_release() {
        // This test requires Chrome to be installed, so we skip it in CI
        if std::env::var("CI").is_ok() {
            return;
        }
        let config = PipelineConfig::default();
        let mut session = match RenderSession::acquire(&config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Skipping session test because Chrome is not available: {}", e);
                return;
            }
        };
        assert!(session.tab().is_ok());

        session.close();
        assert!(session.tab().is_err());

        // Idempotent on an already-released handle
        session.close();
    }
}
