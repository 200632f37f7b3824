//! Simple 2D library that records canvas drawing commands and generates a
//! replayable source script instead of painting pixels.
//!
//! Main features:
//!  - Virtual drawing surface presenting the fixed canvas 2D operation set
//!  - Deferred gradient/pattern/pixel-buffer construction, emitted on first use
//!  - Canonical literal encoding and flat, bit-exact statement generation
//!
#![deny(warnings)]

mod code;
mod context;
mod literal;
mod object;
mod ops;
mod render;
mod state;
mod svg;

pub use code::CodeBuilder;
pub use context::{Context2d, SurfaceError};
pub use literal::{EncodeError, ObjectId, PI, Scalar, Value};
pub use object::ObjectKind;
pub use ops::{OpInfo, OpKind, classify, operations};
pub use render::{DEFAULT_SIZE, RenderOptions, Rendered, Renderer, render};
pub use state::DrawState;
pub use svg::{ViewBox, ViewBoxError};
