//! Request orchestration: validate, acquire, render, assemble, release

use crate::{assemble, render, Deck, PipelineConfig, RenderSession, RenderedPage, Result};
use log::{error, info};

/// Sequences one deck-generation request end to end.
///
/// Per request: `Idle -> SessionAcquired -> Rendering(k of N) -> Assembling
/// -> Done`, with any non-terminal failure jumping straight to the terminal
/// error. The session is released on both terminal outcomes; a failure never
/// leaks the Chrome process and never returns a partial deck.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the whole pipeline for one deck and return the PDF bytes.
    ///
    /// Input is validated before the session is acquired, so rejected
    /// requests have no observable browser side effects. Slides render
    /// strictly sequentially in array order on the session's single tab;
    /// the first per-slide failure aborts the remaining slides.
    ///
    /// Capacity note: the worst case wall clock is roughly
    /// `slides * (load_timeout + settle_delay)`. The pipeline does not
    /// enforce a total budget; the hosting environment's request deadline
    /// does.
    pub fn run(&self, deck: &Deck) -> Result<Vec<u8>> {
        deck.validate()?;

        info!("generating PDF for {} slide(s)", deck.slides.len());

        let mut session = RenderSession::acquire(&self.config)?;
        let result = self.render_and_assemble(&session, deck);

        // Unconditional teardown: the render loop and the assembler both
        // funnel through here whether they succeeded or not. (Drop backstops
        // panics.)
        session.close();

        match &result {
            Ok(bytes) => info!(
                "PDF generated: {:.2}MB, {} page(s)",
                bytes.len() as f64 / 1024.0 / 1024.0,
                deck.slides.len()
            ),
            Err(e) => error!("PDF generation failed ({}): {}", e.kind(), e),
        }

        result
    }

    fn render_and_assemble(&self, session: &RenderSession, deck: &Deck) -> Result<Vec<u8>> {
        let mut pages: Vec<RenderedPage> = Vec::with_capacity(deck.slides.len());

        for (position, slide) in deck.slides.iter().enumerate() {
            info!("processing slide {}/{}", position + 1, deck.slides.len());
            pages.push(render::render(session, slide, position, &self.config)?);
        }

        assemble::assemble(&deck.title, &pages)
    }
}
