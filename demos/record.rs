//! Record a small hand-built document and print the generated replay module
#![deny(warnings)]

use canvascript::{Context2d, PI, RenderOptions, Renderer, SurfaceError, render};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

/// Badge document: ring, diagonal, and a gradient-filled label bar
struct Badge;

impl Renderer for Badge {
    fn view_box(&self) -> Option<String> {
        Some("0 0 64 64".to_string())
    }

    fn render(
        &mut self,
        ctx: &mut Context2d,
        _options: &RenderOptions,
    ) -> Result<(), SurfaceError> {
        ctx.set_line_width(3.0)?;
        ctx.set_stroke_style("#202020")?;
        ctx.begin_path()?;
        ctx.arc(32.0, 32.0, 28.0, 0.0, 2.0 * PI, false)?;
        ctx.stroke()?;

        ctx.begin_path()?;
        ctx.move_to(12.0, 52.0)?;
        ctx.line_to(52.0, 12.0)?;
        ctx.stroke()?;

        let grad = ctx.create_linear_gradient(0.0, 44.0, 0.0, 60.0)?;
        ctx.add_color_stop(&grad, 0.0, "#ffd700")?;
        ctx.add_color_stop(&grad, 1.0, "#b8860b")?;
        ctx.set_fill_style(grad)?;
        ctx.begin_path()?;
        ctx.round_rect(8.0, 44.0, 48.0, 16.0, 4.0)?;
        ctx.fill()?;
        Ok(())
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = render(&mut Badge, None, None)?;
    println!("module.exports=function(ctx) {{");
    println!("{}", result.code);
    println!("}};");
    if let Some(view_box) = result.view_box {
        println!(
            "module.exports.viewBox=[{}, {}, {}, {}];",
            view_box.x, view_box.y, view_box.width, view_box.height
        );
    }
    if let Some(width) = result.width {
        println!("module.exports.width={};", width);
    }
    if let Some(height) = result.height {
        println!("module.exports.height={};", height);
    }
    Ok(())
}
