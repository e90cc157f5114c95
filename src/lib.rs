//! deckpdf
//!
//! Renders a sequence of self-contained HTML documents ("slides") into a
//! single multi-page PDF deck. Each slide is loaded into an isolated headless
//! Chrome session at a fixed 1920x1080 viewport, captured as an opaque PNG,
//! and the captures are composed into a PDF whose pages measure exactly
//! 20in x 11.25in (the 96-DPI conversion `inches = pixels / 96`).
//!
//! # Pipeline
//!
//! - **Session** ([`session`]): one Chrome process + one configured tab per
//!   deck request, released on every exit path
//! - **Render** ([`render`]): per-slide content injection, bounded load wait,
//!   settle delay, clipped capture
//! - **Assemble** ([`assemble`]): ordered captures into one PDF byte buffer
//! - **Pipeline** ([`pipeline`]): sequencing, failure taxonomy, guaranteed
//!   teardown
//!
//! # Example
//!
//! ```no_run
//! use deckpdf::{Deck, Pipeline, PipelineConfig, Slide};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let deck = Deck::new(
//!     Some("demo".to_string()),
//!     vec![Slide { html: "<h1>Hello</h1>".to_string(), index: 0 }],
//! );
//!
//! let pdf = Pipeline::new(PipelineConfig::default()).run(&deck)?;
//! std::fs::write(deck.pdf_filename(), pdf)?;
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;

pub mod error;
pub use error::{Error, ErrorPayload, Result};

pub mod session;
pub use session::RenderSession;

pub mod render;

pub mod assemble;

pub mod pipeline;
pub use pipeline::Pipeline;

// Async-friendly facade for hosting the pipeline inside an async transport
pub mod async_api;
pub use async_api::DeckService;

/// Capture viewport width in CSS pixels.
pub const VIEWPORT_WIDTH: u32 = 1920;

/// Capture viewport height in CSS pixels.
pub const VIEWPORT_HEIGHT: u32 = 1080;

/// Pixel density of the pixel-to-physical-unit conversion.
///
/// The PDF page dimensions are derived from the viewport through this value
/// and nothing else. Changing the viewport without the page size (or vice
/// versa) breaks the no-scaling guarantee, which is why the page dimensions
/// below are computed rather than declared.
pub const RENDER_DPI: f32 = 96.0;

/// PDF page width in inches (1920 px / 96 DPI = 20 in).
pub const PAGE_WIDTH_IN: f32 = VIEWPORT_WIDTH as f32 / RENDER_DPI;

/// PDF page height in inches (1080 px / 96 DPI = 11.25 in).
pub const PAGE_HEIGHT_IN: f32 = VIEWPORT_HEIGHT as f32 / RENDER_DPI;

fn default_deck_title() -> String {
    "deck".to_string()
}

/// One input document to be rendered as a single PDF page.
///
/// `index` is caller-supplied metadata used for logging. Output page order
/// always follows the position of the slide in the deck's `slides` array,
/// never this field; uniqueness is not checked.
#[derive(Debug, Clone, Deserialize)]
pub struct Slide {
    /// Self-contained HTML markup for the slide
    pub html: String,
    /// Caller-supplied ordering hint (descriptive only)
    #[serde(default)]
    pub index: i64,
}

/// The full ordered set of slides submitted in one request.
///
/// Deserializes from the wire shape `{"deckTitle": ..., "slides": [...]}`;
/// a missing title defaults to `"deck"`.
#[derive(Debug, Clone, Deserialize)]
pub struct Deck {
    /// Title used to derive the suggested output filename
    #[serde(rename = "deckTitle", default = "default_deck_title")]
    pub title: String,
    /// Slides in authoritative output order
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new(title: Option<String>, slides: Vec<Slide>) -> Self {
        Self {
            title: title.unwrap_or_else(default_deck_title),
            slides,
        }
    }

    /// Check the boundary precondition: a deck must contain at least one
    /// slide. Called before any session is acquired so that malformed input
    /// never spawns a browser process.
    pub fn validate(&self) -> Result<()> {
        if self.slides.is_empty() {
            return Err(Error::Validation(
                "slides array with at least one slide required".to_string(),
            ));
        }
        Ok(())
    }

    /// Suggested download filename, `"{title}.pdf"`.
    pub fn pdf_filename(&self) -> String {
        format!("{}.pdf", self.title)
    }
}

/// The fixed-resolution capture of one slide, tagged with its 0-based
/// output position. Produced by [`render`] and consumed exactly once by
/// [`assemble`].
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// 0-based output order (array position, not `Slide::index`)
    pub position: usize,
    /// PNG-encoded 1920x1080 capture
    pub png: Vec<u8>,
}

/// Tunable parameters of the rendering pipeline.
///
/// The viewport and page geometry are deliberately absent: they are locked
/// constants (see [`RENDER_DPI`]).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper bound on one slide's load-and-network-settle wait, in
    /// milliseconds. Exceeding it fails the whole request with a timeout.
    pub load_timeout_ms: u64,
    /// Fixed wait between the load signal and capture, in milliseconds.
    ///
    /// This is a heuristic window for late asynchronous paints (web fonts,
    /// image decode), not a completion guarantee: documents that keep
    /// painting past it produce visually incomplete captures.
    pub settle_delay_ms: u64,
    /// Include raw internal failure detail in [`ErrorPayload`]s. Off by
    /// default; raw diagnostics can disclose environment internals.
    pub verbose_diagnostics: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: 30_000,
            settle_delay_ms: 500,
            verbose_diagnostics: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.load_timeout_ms, 30_000);
        assert_eq!(config.settle_delay_ms, 500);
        assert!(!config.verbose_diagnostics);
    }

    #[test]
    fn test_page_geometry_locked_to_viewport() {
        assert_eq!(PAGE_WIDTH_IN, 20.0);
        assert_eq!(PAGE_HEIGHT_IN, 11.25);
        assert_eq!((PAGE_WIDTH_IN * RENDER_DPI) as u32, VIEWPORT_WIDTH);
        assert_eq!((PAGE_HEIGHT_IN * RENDER_DPI) as u32, VIEWPORT_HEIGHT);
    }

    #[test]
    fn test_deck_parses_wire_shape() {
        let deck: Deck = serde_json::from_str(
            r#"{"deckTitle":"demo","slides":[{"html":"<h1>Hi</h1>","index":0}]}"#,
        )
        .unwrap();
        assert_eq!(deck.title, "demo");
        assert_eq!(deck.slides.len(), 1);
        assert_eq!(deck.pdf_filename(), "demo.pdf");
    }

    #[test]
    fn test_deck_title_defaults() {
        let deck: Deck =
            serde_json::from_str(r#"{"slides":[{"html":"<p>x</p>","index":0}]}"#).unwrap();
        assert_eq!(deck.title, "deck");
    }

    #[test]
    fn test_slide_order_is_array_order_not_index_order() {
        let deck: Deck = serde_json::from_str(
            r#"{"slides":[
                {"html":"A","index":2},
                {"html":"B","index":0},
                {"html":"C","index":1}
            ]}"#,
        )
        .unwrap();
        // The index field is descriptive metadata; nothing sorts on it.
        let htmls: Vec<&str> = deck.slides.iter().map(|s| s.html.as_str()).collect();
        assert_eq!(htmls, vec!["A", "B", "C"]);
        assert_eq!(deck.slides[0].index, 2);
    }

    #[test]
    fn test_empty_deck_rejected() {
        let deck = Deck::new(None, vec![]);
        let err = deck.validate().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_missing_slides_field_fails_to_parse() {
        let res: std::result::Result<Deck, _> = serde_json::from_str(r#"{"deckTitle":"x"}"#);
        assert!(res.is_err());
    }
}
