//! Orchestrator: wires an external renderer to a fresh virtual surface and
//! serializes the recorded session
use crate::{CodeBuilder, Context2d, Scalar, SurfaceError, ViewBox};

/// Surface size used when neither a declared size nor a view region is available
pub const DEFAULT_SIZE: Scalar = 100.0;

/// External renderer boundary.
///
/// The renderer walks its own document model and issues drawing operations
/// against the surface it is given. Rendering is a one-shot, synchronous
/// pass; any surface error must be propagated back unchanged.
pub trait Renderer {
    /// Raw view-box attribute of the source document, when one is declared
    fn view_box(&self) -> Option<String>;

    /// Issue the document's drawing operations against the virtual surface
    fn render(&mut self, ctx: &mut Context2d, options: &RenderOptions) -> Result<(), SurfaceError>;
}

/// Renderer configuration for a recording pass.
///
/// Defaults disable every interactive and incremental behavior: recording is
/// deterministic and runs exactly once. Declared document dimensions are
/// authoritative (`ignore_dimensions`): the renderer must not re-derive
/// them from rendered geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub ignore_mouse: bool,
    pub ignore_animation: bool,
    pub ignore_dimensions: bool,
    pub ignore_clear: bool,
    pub enable_redraw: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ignore_mouse: true,
            ignore_animation: true,
            ignore_dimensions: true,
            ignore_clear: true,
            enable_redraw: false,
        }
    }
}

/// Result of one recording pass
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Replay script: flat statements, one per line, indented one level
    pub code: String,
    pub width: Option<Scalar>,
    pub height: Option<Scalar>,
    pub view_box: Option<ViewBox>,
}

/// Record one document render and serialize it to replayable source.
///
/// `width` and `height` are the document's declared sizes, when present;
/// absent or non-finite values fall back to the view region, and the surface
/// itself falls back to [`DEFAULT_SIZE`] when both are missing.
pub fn render(
    renderer: &mut dyn Renderer,
    width: Option<Scalar>,
    height: Option<Scalar>,
) -> Result<Rendered, SurfaceError> {
    let view_box = renderer
        .view_box()
        .and_then(|attr| attr.parse::<ViewBox>().ok());
    let width = resolve(width, view_box.map(|vb| vb.width));
    let height = resolve(height, view_box.map(|vb| vb.height));

    let mut ctx = Context2d::new(width.unwrap_or(DEFAULT_SIZE), height.unwrap_or(DEFAULT_SIZE));
    let options = RenderOptions::default();
    tracing::debug_span!("[record]").in_scope(|| renderer.render(&mut ctx, &options))?;
    tracing::debug!("[record:instructions] {}", ctx.instruction_count());

    let mut code = CodeBuilder::new();
    code.indent();
    tracing::debug_span!("[generate]").in_scope(|| ctx.generate(&mut code))?;

    Ok(Rendered {
        code: code.code(),
        width,
        height,
        view_box,
    })
}

// Declared size wins, the fallback fills in; non-finite means absent.
fn resolve(declared: Option<Scalar>, fallback: Option<Scalar>) -> Option<Scalar> {
    declared
        .filter(|size| size.is_finite())
        .or_else(|| fallback.filter(|size| size.is_finite()))
}
