use std::ops::Range;
use std::sync::Arc;

use labyrinth_common::{RenderMode, View};

use crate::details::RendererDetails;
use crate::dispatch::ThreadedRenderer;
use crate::error::RenderError;
use crate::frame::{FrameBuffer, PixelSink};
use crate::raycast::draw_column;

/// Produces one frame per call from shared details and the current view.
///
/// A renderer only reads the maze; the exit signal is its one side effect.
pub trait Renderer: Send {
    fn render(&mut self, view: &View) -> Result<FrameBuffer, RenderError>;

    fn mode(&self) -> RenderMode;

    fn details(&self) -> &Arc<RendererDetails>;
}

/// A contiguous range of screen columns, the unit of dispatched work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSpan {
    pub start: usize,
    pub end: usize,
}

impl RenderSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn columns(self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }
}

/// Draw every column of `span` into `sink`.
pub fn render_span(
    details: &RendererDetails,
    view: &View,
    span: RenderSpan,
    sink: &mut impl PixelSink,
) -> Result<(), RenderError> {
    for x in span.columns() {
        draw_column(details, view, x, sink)?;
    }
    Ok(())
}

/// Reference renderer: every column on the calling thread.
pub struct SingleThreadRenderer {
    details: Arc<RendererDetails>,
}

impl SingleThreadRenderer {
    pub fn new(details: Arc<RendererDetails>) -> Self {
        Self { details }
    }
}

impl Renderer for SingleThreadRenderer {
    fn render(&mut self, view: &View) -> Result<FrameBuffer, RenderError> {
        let details = &self.details;
        let mut frame = FrameBuffer::new(details.width(), details.height());
        frame.fill_background(details.sky(), details.floor());
        render_span(details, view, RenderSpan::new(0, details.width()), &mut frame)?;
        Ok(frame)
    }

    fn mode(&self) -> RenderMode {
        RenderMode::SingleThread
    }

    fn details(&self) -> &Arc<RendererDetails> {
        &self.details
    }
}

/// Build the renderer for `mode`. `threads` is ignored in single-thread mode.
pub fn build_renderer(
    mode: RenderMode,
    threads: usize,
    details: Arc<RendererDetails>,
) -> Result<Box<dyn Renderer>, RenderError> {
    tracing::debug!(%mode, threads, "building renderer");
    Ok(match mode {
        RenderMode::SingleThread => Box::new(SingleThreadRenderer::new(details)),
        RenderMode::Strip | RenderMode::Chunk => {
            Box::new(ThreadedRenderer::new(mode, threads, details)?)
        }
    })
}
