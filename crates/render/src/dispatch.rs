use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use labyrinth_common::{RenderMode, View};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::details::RendererDetails;
use crate::error::RenderError;
use crate::frame::{FrameBuffer, SharedFrame};
use crate::renderer::{RenderSpan, Renderer, render_span};

type UnitResult = Result<Result<(), RenderError>, Box<dyn Any + Send>>;

/// Work run for one span on a pool thread.
type UnitFn = fn(&RendererDetails, &View, RenderSpan, &mut &SharedFrame) -> Result<(), RenderError>;

fn draw_unit(
    details: &RendererDetails,
    view: &View,
    span: RenderSpan,
    sink: &mut &SharedFrame,
) -> Result<(), RenderError> {
    render_span(details, view, span, sink)
}

/// Split `width` columns into dispatch units for `mode`.
///
/// Strip mode yields one single-column span per column. Chunk mode yields
/// exactly `threads` equal spans and rejects a `threads` that does not
/// divide `width`.
pub fn plan_spans(
    mode: RenderMode,
    width: usize,
    threads: usize,
) -> Result<Vec<RenderSpan>, RenderError> {
    if threads == 0 {
        return Err(RenderError::ZeroThreads);
    }
    Ok(match mode {
        RenderMode::SingleThread => vec![RenderSpan::new(0, width)],
        RenderMode::Strip => (0..width).map(|x| RenderSpan::new(x, x + 1)).collect(),
        RenderMode::Chunk => {
            if width % threads != 0 {
                return Err(RenderError::ChunkMismatch { width, threads });
            }
            let size = width / threads;
            (0..threads)
                .map(|i| RenderSpan::new(i * size, (i + 1) * size))
                .collect()
        }
    })
}

/// Strip or chunk renderer over a fixed rayon pool.
///
/// Each frame: fill the background, submit every span, then wait on the
/// handles in submission order. A failed or panicking span is logged and
/// leaves its columns showing background.
pub struct ThreadedRenderer {
    mode: RenderMode,
    details: Arc<RendererDetails>,
    pool: ThreadPool,
    spans: Vec<RenderSpan>,
    frame: Arc<SharedFrame>,
    unit: UnitFn,
}

impl ThreadedRenderer {
    pub fn new(
        mode: RenderMode,
        threads: usize,
        details: Arc<RendererDetails>,
    ) -> Result<Self, RenderError> {
        let spans = plan_spans(mode, details.width(), threads)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("render-{i}"))
            .build()?;
        let frame = Arc::new(SharedFrame::new(details.width(), details.height()));
        Ok(Self {
            mode,
            details,
            pool,
            spans,
            frame,
            unit: draw_unit,
        })
    }

    #[cfg(test)]
    fn with_unit(mut self, unit: UnitFn) -> Self {
        self.unit = unit;
        self
    }

    pub fn spans(&self) -> &[RenderSpan] {
        &self.spans
    }

    fn submit(&self, span: RenderSpan, view: View) -> Receiver<UnitResult> {
        let (tx, rx) = mpsc::sync_channel(1);
        let details = Arc::clone(&self.details);
        let frame = Arc::clone(&self.frame);
        let unit = self.unit;
        self.pool.spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                let mut sink = &*frame;
                unit(&details, &view, span, &mut sink)
            }));
            let _ = tx.send(result);
        });
        rx
    }
}

impl Renderer for ThreadedRenderer {
    fn render(&mut self, view: &View) -> Result<FrameBuffer, RenderError> {
        let _span = tracing::trace_span!("render_frame", mode = %self.mode, units = self.spans.len())
            .entered();

        self.frame
            .fill_background(self.details.sky(), self.details.floor());

        let mut handles: VecDeque<(RenderSpan, Receiver<UnitResult>)> = self
            .spans
            .iter()
            .map(|span| (*span, self.submit(*span, *view)))
            .collect();

        while let Some((span, handle)) = handles.pop_front() {
            match handle.recv() {
                Ok(Ok(Ok(()))) => {}
                Ok(Ok(Err(err))) => {
                    tracing::error!(start = span.start, end = span.end, %err, "render unit failed");
                }
                Ok(Err(_)) => {
                    tracing::error!(start = span.start, end = span.end, "render unit panicked");
                }
                Err(_) => {
                    tracing::error!(start = span.start, end = span.end, "render unit dropped");
                }
            }
        }

        Ok(self.frame.snapshot())
    }

    fn mode(&self) -> RenderMode {
        self.mode
    }

    fn details(&self) -> &Arc<RendererDetails> {
        &self.details
    }
}
