//! Per-slide rendering: content injection, load wait, settle delay, capture

use crate::{Error, PipelineConfig, RenderSession, RenderedPage, Result, Slide};
use crate::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use base64::Engine as Base64Engine;
use headless_chrome::protocol::cdp::Page;
use log::debug;
use std::time::Duration;

/// Render one slide to a 1920x1080 PNG capture.
///
/// The slide's markup becomes the full document content of the session's tab
/// (injected as a base64 `data:` URL, so no network round trip is needed for
/// the markup itself). The call then waits for the navigation/load signal,
/// bounded by `config.load_timeout_ms`, sleeps for the settle delay to absorb
/// late asynchronous paints, and captures the viewport rectangle with an
/// opaque background.
///
/// `position` is the slide's place in the input array and is authoritative
/// for output order; `slide.index` only appears in log output.
pub fn render(
    session: &RenderSession,
    slide: &Slide,
    position: usize,
    config: &PipelineConfig,
) -> Result<RenderedPage> {
    let tab = session.tab()?;

    debug!("rendering slide {} (caller index {})", position, slide.index);

    let url = data_url(&slide.html);
    tab.navigate_to(&url)
        .map_err(|e| classify_wait_error(position, config.load_timeout_ms, e))?;
    tab.wait_until_navigated()
        .map_err(|e| classify_wait_error(position, config.load_timeout_ms, e))?;

    // Heuristic window for web fonts and late image decode. Documents whose
    // rendering completes after this window produce visually incomplete
    // captures; that is a documented limitation, not a bug to absorb here.
    std::thread::sleep(Duration::from_millis(config.settle_delay_ms));

    // Clip exactly to the viewport rectangle regardless of the document's
    // natural size, background included.
    let clip = Page::Viewport {
        x: 0.0,
        y: 0.0,
        width: VIEWPORT_WIDTH as f64,
        height: VIEWPORT_HEIGHT as f64,
        scale: 1.0,
    };
    let png = tab
        .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
        .map_err(|e| Error::RenderContent {
            index: position,
            detail: format!("screenshot failed: {}", e),
        })?;

    Ok(RenderedPage { position, png })
}

/// Encode slide markup as a `data:` URL suitable for `Tab::navigate_to`.
fn data_url(html: &str) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(html.as_bytes());
    format!("data:text/html;charset=utf-8;base64,{}", b64)
}

/// Split navigation failures into the timeout kind and everything else.
///
/// `headless_chrome` signals an exhausted wait with its `util::Timeout`
/// marker inside the error chain; any other navigation failure is a content
/// failure for this slide.
fn classify_wait_error(position: usize, timeout_ms: u64, err: anyhow::Error) -> Error {
    if err.downcast_ref::<headless_chrome::util::Timeout>().is_some() {
        Error::RenderTimeout {
            index: position,
            timeout_ms,
        }
    } else {
        Error::RenderContent {
            index: position,
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_shape() {
        let url = data_url("<h1>Hi</h1>");
        assert!(url.starts_with("data:text/html;charset=utf-8;base64,"));
        let b64 = url.rsplit(',').next().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD.decode(b64).unwrap();
        assert_eq!(decoded, b"<h1>Hi</h1>");
    }

    #[test]
    fn test_wait_timeout_classified_as_timeout() {
        let err = anyhow::Error::new(headless_chrome::util::Timeout);
        let classified = classify_wait_error(2, 30_000, err);
        assert!(matches!(
            classified,
            Error::RenderTimeout { index: 2, timeout_ms: 30_000 }
        ));
    }

    #[test]
    fn test_other_wait_failures_classified_as_content() {
        let err = anyhow::anyhow!("tab crashed");
        let classified = classify_wait_error(0, 30_000, err);
        match classified {
            Error::RenderContent { index, detail } => {
                assert_eq!(index, 0);
                assert!(detail.contains("tab crashed"));
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }
}
