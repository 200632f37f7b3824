//! Virtual drawing surface: records classified operations instead of painting
use crate::{
    CodeBuilder, DrawState, EncodeError, ObjectId, Scalar, Value,
    object::DeferredObject,
    ops::{self, OpKind},
};
use std::{fmt, mem};

// One recording session walks idle -> recording -> finalized, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Recording,
    Finalized,
}

#[derive(Debug, Clone)]
enum Target {
    Ctx,
    Var(String),
}

impl Target {
    fn as_str(&self) -> &str {
        match self {
            Target::Ctx => "ctx",
            Target::Var(var) => var,
        }
    }
}

// Recorded instruction; insertion order is emission order.
#[derive(Debug, Clone)]
enum Instr {
    Call {
        target: Target,
        name: &'static str,
        args: Vec<Value>,
    },
    Assign {
        property: &'static str,
        value: Value,
    },
    Let {
        var: String,
        factory: &'static str,
        args: Vec<Value>,
    },
}

/// Stateful recorder presenting the 2D-context operation surface.
///
/// One instance records exactly one session: a renderer issues operations,
/// the surface classifies and buffers them, and [`Context2d::generate`]
/// replays the result into a [`CodeBuilder`] exactly once.
#[derive(Debug)]
pub struct Context2d {
    width: Scalar,
    height: Scalar,
    state: DrawState,
    instrs: Vec<Instr>,
    path: Vec<Instr>,
    path_has_geometry: bool,
    objects: Vec<DeferredObject>,
    var_counter: usize,
    phase: Phase,
}

impl Context2d {
    pub fn new(width: Scalar, height: Scalar) -> Self {
        Self {
            width,
            height,
            state: DrawState::new(),
            instrs: Vec::new(),
            path: Vec::new(),
            path_has_geometry: false,
            objects: Vec::new(),
            var_counter: 0,
            phase: Phase::Idle,
        }
    }

    pub fn width(&self) -> Scalar {
        self.width
    }

    pub fn height(&self) -> Scalar {
        self.height
    }

    /// Current drawing state
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Finalized
    }

    /// Number of instructions recorded so far
    pub fn instruction_count(&self) -> usize {
        self.instrs.len()
    }

    fn ensure_recording(&mut self) -> Result<(), SurfaceError> {
        match self.phase {
            Phase::Finalized => Err(SurfaceError::Finalized),
            Phase::Idle => {
                self.phase = Phase::Recording;
                Ok(())
            }
            Phase::Recording => Ok(()),
        }
    }

    // Materialize object-handle arguments, verify everything else.
    fn prepare_args(&mut self, args: &[Value]) -> Result<Vec<Value>, SurfaceError> {
        for arg in args {
            if let Value::Object(id) = arg {
                self.materialize(*id)?;
            } else {
                arg.check()?;
            }
        }
        Ok(args.to_vec())
    }

    /// Invoke an operation by name.
    ///
    /// Names absent from the classifier are tolerated and record nothing,
    /// since renderers legitimately probe optional capabilities. Creation
    /// operations return the deferred-object handle.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Option<Value>, SurfaceError> {
        self.ensure_recording()?;
        let Some(op) = ops::classify(name) else {
            return Ok(None);
        };
        if let Some(ignore) = op.ignore {
            if ignore(args) {
                return Ok(None);
            }
        }
        match op.kind {
            OpKind::Inert => Ok(None),
            OpKind::Unsupported => Err(SurfaceError::Unsupported(op.name)),
            OpKind::Create => {
                let Some(kind) = op.factory else {
                    return Ok(None);
                };
                let id = ObjectId::new(self.objects.len());
                self.objects
                    .push(DeferredObject::new(kind, op.name, args.to_vec()));
                Ok(Some(Value::Object(id)))
            }
            OpKind::State | OpKind::Draw => {
                let args = self.prepare_args(args)?;
                self.instrs.push(Instr::Call {
                    target: Target::Ctx,
                    name: op.name,
                    args,
                });
                Ok(None)
            }
            OpKind::PathBuild => {
                let args = self.prepare_args(args)?;
                if op.name == "beginPath" {
                    self.path.clear();
                    self.path_has_geometry = false;
                } else if op.name != "closePath" {
                    self.path_has_geometry = true;
                }
                self.path.push(Instr::Call {
                    target: Target::Ctx,
                    name: op.name,
                    args,
                });
                Ok(None)
            }
            OpKind::PathDraw => {
                // no path, nothing to draw
                if !self.path_has_geometry {
                    return Ok(None);
                }
                let args = self.prepare_args(args)?;
                self.instrs.extend(self.path.iter().cloned());
                self.instrs.push(Instr::Call {
                    target: Target::Ctx,
                    name: op.name,
                    args,
                });
                Ok(None)
            }
        }
    }

    /// Write a state property.
    ///
    /// Binding a deferred-object handle materializes it first; the recorded
    /// assignment then encodes to the object's variable name. Names outside
    /// the state table are tolerated and record nothing.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), SurfaceError> {
        self.ensure_recording()?;
        let Some(property) = DrawState::canonical(name) else {
            return Ok(());
        };
        if let Value::Object(id) = &value {
            self.materialize(*id)?;
        } else {
            value.check()?;
        }
        self.instrs.push(Instr::Assign {
            property,
            value: value.clone(),
        });
        self.state.set(property, value);
        Ok(())
    }

    /// Read a state property
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.state.get(name)
    }

    /// Invoke a mutator on a deferred object (`addColorStop`, `setTransform`).
    ///
    /// Calls made before materialization are buffered on the object; calls
    /// made after append instructions directly, in call order. Unknown
    /// mutator names and non-handle targets record nothing.
    pub fn call_object(
        &mut self,
        handle: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<(), SurfaceError> {
        self.ensure_recording()?;
        let Value::Object(id) = handle else {
            return Ok(());
        };
        let Some(object) = self.objects.get(id.index()) else {
            return Ok(());
        };
        let Some(mutator) = object.kind.mutator(name) else {
            return Ok(());
        };
        match object.var.clone() {
            Some(var) => {
                Value::check_all(args)?;
                self.instrs.push(Instr::Call {
                    target: Target::Var(var),
                    name: mutator,
                    args: args.to_vec(),
                });
            }
            None => {
                self.objects[id.index()].pending.push((mutator, args.to_vec()));
            }
        }
        Ok(())
    }

    // Emit the constructor once, then drain pending mutators in call order.
    // Arguments are validated here, not at creation time: an object that is
    // never used never fails.
    fn materialize(&mut self, id: ObjectId) -> Result<(), SurfaceError> {
        let index = id.index();
        if index >= self.objects.len() {
            return Ok(());
        }
        let var = match self.objects[index].var.clone() {
            Some(var) => var,
            None => {
                Value::check_all(&self.objects[index].args)?;
                let var = format!("{}{}", self.objects[index].kind.prefix(), self.var_counter);
                self.var_counter += 1;
                self.objects[index].var = Some(var.clone());
                let factory = self.objects[index].factory;
                let args = self.objects[index].args.clone();
                self.instrs.push(Instr::Let {
                    var: var.clone(),
                    factory,
                    args,
                });
                var
            }
        };
        let pending = mem::take(&mut self.objects[index].pending);
        for (name, args) in pending {
            Value::check_all(&args)?;
            self.instrs.push(Instr::Call {
                target: Target::Var(var.clone()),
                name,
                args,
            });
        }
        Ok(())
    }

    /// Replay every recorded instruction into `code`, in insertion order,
    /// exactly once. The surface is finalized afterwards, also on failure:
    /// recording never continues past a fatal error.
    pub fn generate(&mut self, code: &mut CodeBuilder) -> Result<(), SurfaceError> {
        if self.phase == Phase::Finalized {
            return Err(SurfaceError::Finalized);
        }
        self.phase = Phase::Finalized;
        let names: Vec<Option<String>> = self.objects.iter().map(|obj| obj.var.clone()).collect();
        for instr in self.instrs.iter() {
            match instr {
                Instr::Call { target, name, args } => {
                    let args = encode_args(args, &names)?;
                    code.call(target.as_str(), name, &args);
                }
                Instr::Assign { property, value } => {
                    let value = value.encode_with(&names)?;
                    code.assign("ctx", property, &value);
                }
                Instr::Let { var, factory, args } => {
                    let args = encode_args(args, &names)?;
                    code.let_call(var, "ctx", factory, &args);
                }
            }
        }
        Ok(())
    }
}

fn encode_args(args: &[Value], names: &[Option<String>]) -> Result<Vec<String>, EncodeError> {
    args.iter().map(|arg| arg.encode_with(names)).collect()
}

// Typed facade over the fixed operation set. Every method is a one-line
// delegate to the classified entry points above.
impl Context2d {
    pub fn begin_path(&mut self) -> Result<(), SurfaceError> {
        self.call("beginPath", &[]).map(|_| ())
    }

    pub fn close_path(&mut self) -> Result<(), SurfaceError> {
        self.call("closePath", &[]).map(|_| ())
    }

    pub fn move_to(&mut self, x: Scalar, y: Scalar) -> Result<(), SurfaceError> {
        self.call("moveTo", &[Value::Num(x), Value::Num(y)]).map(|_| ())
    }

    pub fn line_to(&mut self, x: Scalar, y: Scalar) -> Result<(), SurfaceError> {
        self.call("lineTo", &[Value::Num(x), Value::Num(y)]).map(|_| ())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bezier_curve_to(
        &mut self,
        cp1x: Scalar,
        cp1y: Scalar,
        cp2x: Scalar,
        cp2y: Scalar,
        x: Scalar,
        y: Scalar,
    ) -> Result<(), SurfaceError> {
        self.call(
            "bezierCurveTo",
            &[
                Value::Num(cp1x),
                Value::Num(cp1y),
                Value::Num(cp2x),
                Value::Num(cp2y),
                Value::Num(x),
                Value::Num(y),
            ],
        )
        .map(|_| ())
    }

    pub fn quadratic_curve_to(
        &mut self,
        cpx: Scalar,
        cpy: Scalar,
        x: Scalar,
        y: Scalar,
    ) -> Result<(), SurfaceError> {
        self.call(
            "quadraticCurveTo",
            &[Value::Num(cpx), Value::Num(cpy), Value::Num(x), Value::Num(y)],
        )
        .map(|_| ())
    }

    pub fn arc(
        &mut self,
        x: Scalar,
        y: Scalar,
        radius: Scalar,
        start_angle: Scalar,
        end_angle: Scalar,
        anticlockwise: bool,
    ) -> Result<(), SurfaceError> {
        self.call(
            "arc",
            &[
                Value::Num(x),
                Value::Num(y),
                Value::Num(radius),
                Value::Num(start_angle),
                Value::Num(end_angle),
                Value::Bool(anticlockwise),
            ],
        )
        .map(|_| ())
    }

    pub fn arc_to(
        &mut self,
        x1: Scalar,
        y1: Scalar,
        x2: Scalar,
        y2: Scalar,
        radius: Scalar,
    ) -> Result<(), SurfaceError> {
        self.call(
            "arcTo",
            &[
                Value::Num(x1),
                Value::Num(y1),
                Value::Num(x2),
                Value::Num(y2),
                Value::Num(radius),
            ],
        )
        .map(|_| ())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn ellipse(
        &mut self,
        x: Scalar,
        y: Scalar,
        radius_x: Scalar,
        radius_y: Scalar,
        rotation: Scalar,
        start_angle: Scalar,
        end_angle: Scalar,
        anticlockwise: bool,
    ) -> Result<(), SurfaceError> {
        self.call(
            "ellipse",
            &[
                Value::Num(x),
                Value::Num(y),
                Value::Num(radius_x),
                Value::Num(radius_y),
                Value::Num(rotation),
                Value::Num(start_angle),
                Value::Num(end_angle),
                Value::Bool(anticlockwise),
            ],
        )
        .map(|_| ())
    }

    pub fn rect(&mut self, x: Scalar, y: Scalar, width: Scalar, height: Scalar) -> Result<(), SurfaceError> {
        self.call(
            "rect",
            &[Value::Num(x), Value::Num(y), Value::Num(width), Value::Num(height)],
        )
        .map(|_| ())
    }

    pub fn round_rect(
        &mut self,
        x: Scalar,
        y: Scalar,
        width: Scalar,
        height: Scalar,
        radii: impl Into<Value>,
    ) -> Result<(), SurfaceError> {
        self.call(
            "roundRect",
            &[
                Value::Num(x),
                Value::Num(y),
                Value::Num(width),
                Value::Num(height),
                radii.into(),
            ],
        )
        .map(|_| ())
    }

    pub fn fill(&mut self) -> Result<(), SurfaceError> {
        self.call("fill", &[]).map(|_| ())
    }

    pub fn stroke(&mut self) -> Result<(), SurfaceError> {
        self.call("stroke", &[]).map(|_| ())
    }

    pub fn clip(&mut self) -> Result<(), SurfaceError> {
        self.call("clip", &[]).map(|_| ())
    }

    pub fn fill_rect(&mut self, x: Scalar, y: Scalar, width: Scalar, height: Scalar) -> Result<(), SurfaceError> {
        self.call(
            "fillRect",
            &[Value::Num(x), Value::Num(y), Value::Num(width), Value::Num(height)],
        )
        .map(|_| ())
    }

    pub fn stroke_rect(&mut self, x: Scalar, y: Scalar, width: Scalar, height: Scalar) -> Result<(), SurfaceError> {
        self.call(
            "strokeRect",
            &[Value::Num(x), Value::Num(y), Value::Num(width), Value::Num(height)],
        )
        .map(|_| ())
    }

    pub fn clear_rect(&mut self, x: Scalar, y: Scalar, width: Scalar, height: Scalar) -> Result<(), SurfaceError> {
        self.call(
            "clearRect",
            &[Value::Num(x), Value::Num(y), Value::Num(width), Value::Num(height)],
        )
        .map(|_| ())
    }

    pub fn fill_text(&mut self, text: &str, x: Scalar, y: Scalar) -> Result<(), SurfaceError> {
        self.call("fillText", &[Value::from(text), Value::Num(x), Value::Num(y)])
            .map(|_| ())
    }

    pub fn stroke_text(&mut self, text: &str, x: Scalar, y: Scalar) -> Result<(), SurfaceError> {
        self.call("strokeText", &[Value::from(text), Value::Num(x), Value::Num(y)])
            .map(|_| ())
    }

    pub fn put_image_data(&mut self, data: &Value, dx: Scalar, dy: Scalar) -> Result<(), SurfaceError> {
        self.call("putImageData", &[data.clone(), Value::Num(dx), Value::Num(dy)])
            .map(|_| ())
    }

    pub fn save(&mut self) -> Result<(), SurfaceError> {
        self.call("save", &[]).map(|_| ())
    }

    pub fn restore(&mut self) -> Result<(), SurfaceError> {
        self.call("restore", &[]).map(|_| ())
    }

    pub fn reset(&mut self) -> Result<(), SurfaceError> {
        self.call("reset", &[]).map(|_| ())
    }

    pub fn translate(&mut self, x: Scalar, y: Scalar) -> Result<(), SurfaceError> {
        self.call("translate", &[Value::Num(x), Value::Num(y)]).map(|_| ())
    }

    pub fn scale(&mut self, x: Scalar, y: Scalar) -> Result<(), SurfaceError> {
        self.call("scale", &[Value::Num(x), Value::Num(y)]).map(|_| ())
    }

    pub fn rotate(&mut self, angle: Scalar) -> Result<(), SurfaceError> {
        self.call("rotate", &[Value::Num(angle)]).map(|_| ())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn transform(
        &mut self,
        a: Scalar,
        b: Scalar,
        c: Scalar,
        d: Scalar,
        e: Scalar,
        f: Scalar,
    ) -> Result<(), SurfaceError> {
        self.call(
            "transform",
            &[
                Value::Num(a),
                Value::Num(b),
                Value::Num(c),
                Value::Num(d),
                Value::Num(e),
                Value::Num(f),
            ],
        )
        .map(|_| ())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_transform(
        &mut self,
        a: Scalar,
        b: Scalar,
        c: Scalar,
        d: Scalar,
        e: Scalar,
        f: Scalar,
    ) -> Result<(), SurfaceError> {
        self.call(
            "setTransform",
            &[
                Value::Num(a),
                Value::Num(b),
                Value::Num(c),
                Value::Num(d),
                Value::Num(e),
                Value::Num(f),
            ],
        )
        .map(|_| ())
    }

    pub fn reset_transform(&mut self) -> Result<(), SurfaceError> {
        self.call("resetTransform", &[]).map(|_| ())
    }

    pub fn set_line_dash(&mut self, segments: &[Scalar]) -> Result<(), SurfaceError> {
        let segments = segments.iter().map(|s| Value::Num(*s)).collect();
        self.call("setLineDash", &[Value::List(segments)]).map(|_| ())
    }

    pub fn create_linear_gradient(
        &mut self,
        x0: Scalar,
        y0: Scalar,
        x1: Scalar,
        y1: Scalar,
    ) -> Result<Value, SurfaceError> {
        self.call(
            "createLinearGradient",
            &[Value::Num(x0), Value::Num(y0), Value::Num(x1), Value::Num(y1)],
        )?
        .ok_or(SurfaceError::Unsupported("createLinearGradient"))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_radial_gradient(
        &mut self,
        x0: Scalar,
        y0: Scalar,
        r0: Scalar,
        x1: Scalar,
        y1: Scalar,
        r1: Scalar,
    ) -> Result<Value, SurfaceError> {
        self.call(
            "createRadialGradient",
            &[
                Value::Num(x0),
                Value::Num(y0),
                Value::Num(r0),
                Value::Num(x1),
                Value::Num(y1),
                Value::Num(r1),
            ],
        )?
        .ok_or(SurfaceError::Unsupported("createRadialGradient"))
    }

    pub fn create_conic_gradient(
        &mut self,
        start_angle: Scalar,
        x: Scalar,
        y: Scalar,
    ) -> Result<Value, SurfaceError> {
        self.call(
            "createConicGradient",
            &[Value::Num(start_angle), Value::Num(x), Value::Num(y)],
        )?
        .ok_or(SurfaceError::Unsupported("createConicGradient"))
    }

    pub fn create_pattern(
        &mut self,
        image: impl Into<Value>,
        repetition: &str,
    ) -> Result<Value, SurfaceError> {
        self.call("createPattern", &[image.into(), Value::from(repetition)])?
            .ok_or(SurfaceError::Unsupported("createPattern"))
    }

    pub fn create_image_data(&mut self, width: Scalar, height: Scalar) -> Result<Value, SurfaceError> {
        self.call("createImageData", &[Value::Num(width), Value::Num(height)])?
            .ok_or(SurfaceError::Unsupported("createImageData"))
    }

    pub fn add_color_stop(
        &mut self,
        gradient: &Value,
        offset: Scalar,
        color: &str,
    ) -> Result<(), SurfaceError> {
        self.call_object(
            gradient,
            "addColorStop",
            &[Value::Num(offset), Value::from(color)],
        )
    }

    pub fn set_pattern_transform(
        &mut self,
        pattern: &Value,
        matrix: impl Into<Value>,
    ) -> Result<(), SurfaceError> {
        self.call_object(pattern, "setTransform", &[matrix.into()])
    }

    pub fn set_fill_style(&mut self, value: impl Into<Value>) -> Result<(), SurfaceError> {
        self.set("fillStyle", value.into())
    }

    pub fn set_stroke_style(&mut self, value: impl Into<Value>) -> Result<(), SurfaceError> {
        self.set("strokeStyle", value.into())
    }

    pub fn set_line_width(&mut self, width: Scalar) -> Result<(), SurfaceError> {
        self.set("lineWidth", Value::Num(width))
    }

    pub fn set_line_cap(&mut self, cap: &str) -> Result<(), SurfaceError> {
        self.set("lineCap", Value::from(cap))
    }

    pub fn set_line_join(&mut self, join: &str) -> Result<(), SurfaceError> {
        self.set("lineJoin", Value::from(join))
    }

    pub fn set_miter_limit(&mut self, limit: Scalar) -> Result<(), SurfaceError> {
        self.set("miterLimit", Value::Num(limit))
    }

    pub fn set_global_alpha(&mut self, alpha: Scalar) -> Result<(), SurfaceError> {
        self.set("globalAlpha", Value::Num(alpha))
    }

    pub fn set_font(&mut self, font: &str) -> Result<(), SurfaceError> {
        self.set("font", Value::from(font))
    }

    pub fn set_text_align(&mut self, align: &str) -> Result<(), SurfaceError> {
        self.set("textAlign", Value::from(align))
    }

    pub fn set_text_baseline(&mut self, baseline: &str) -> Result<(), SurfaceError> {
        self.set("textBaseline", Value::from(baseline))
    }
}

/// Error while recording or generating on a virtual surface
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// A recorded value has no canonical literal form
    Encode(EncodeError),
    /// The renderer invoked a capability the surface does not provide
    Unsupported(&'static str),
    /// An operation was issued after the surface was finalized
    Finalized,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceError::{:?}", self)
    }
}

impl From<EncodeError> for SurfaceError {
    fn from(error: EncodeError) -> Self {
        Self::Encode(error)
    }
}

impl std::error::Error for SurfaceError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PI;

    fn generate(ctx: &mut Context2d) -> String {
        let mut code = CodeBuilder::new();
        ctx.generate(&mut code).expect("generation failed");
        code.code()
    }

    #[test]
    fn test_path_flush_order() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        ctx.move_to(0.0, 0.0)?;
        ctx.line_to(10.0, 10.0)?;
        ctx.fill()?;
        assert_eq!(
            generate(&mut ctx),
            "ctx.moveTo(0, 0);\nctx.lineTo(10, 10);\nctx.fill();"
        );
        Ok(())
    }

    #[test]
    fn test_empty_path_suppression() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        ctx.fill()?;
        ctx.begin_path()?;
        ctx.stroke()?;
        assert_eq!(generate(&mut ctx), "");

        // closePath alone is not geometry either
        let mut ctx = Context2d::new(100.0, 100.0);
        ctx.begin_path()?;
        ctx.close_path()?;
        ctx.fill()?;
        assert_eq!(generate(&mut ctx), "");
        Ok(())
    }

    #[test]
    fn test_begin_path_resets_buffer() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        ctx.begin_path()?;
        ctx.move_to(1.0, 1.0)?;
        ctx.begin_path()?;
        ctx.rect(0.0, 0.0, 4.0, 4.0)?;
        ctx.fill()?;
        assert_eq!(
            generate(&mut ctx),
            "ctx.beginPath();\nctx.rect(0, 0, 4, 4);\nctx.fill();"
        );
        Ok(())
    }

    #[test]
    fn test_path_buffer_is_copied_not_moved() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        ctx.begin_path()?;
        ctx.move_to(0.0, 0.0)?;
        ctx.line_to(10.0, 10.0)?;
        ctx.fill()?;
        ctx.stroke()?;
        assert_eq!(
            generate(&mut ctx),
            "ctx.beginPath();\n\
             ctx.moveTo(0, 0);\n\
             ctx.lineTo(10, 10);\n\
             ctx.fill();\n\
             ctx.beginPath();\n\
             ctx.moveTo(0, 0);\n\
             ctx.lineTo(10, 10);\n\
             ctx.stroke();"
        );
        Ok(())
    }

    #[test]
    fn test_identity_transform_suppression() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        ctx.translate(0.0, 0.0)?;
        ctx.scale(1.0, 1.0)?;
        ctx.scale(Scalar::NAN, 2.0)?; // non-numeric factors never scale
        ctx.translate(0.0, 3.0)?;
        ctx.scale(2.0, 1.0)?;
        assert_eq!(
            generate(&mut ctx),
            "ctx.translate(0, 3);\nctx.scale(2, 1);"
        );
        Ok(())
    }

    #[test]
    fn test_non_finite_argument_is_fatal() {
        let mut ctx = Context2d::new(100.0, 100.0);
        assert!(matches!(
            ctx.translate(Scalar::NAN, 1.0),
            Err(SurfaceError::Encode(EncodeError::NonFinite(_)))
        ));
    }

    #[test]
    fn test_lazy_gradient_unused() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        let grad = ctx.create_linear_gradient(0.0, 0.0, 100.0, 0.0)?;
        ctx.add_color_stop(&grad, 0.0, "#ff0000")?;
        ctx.add_color_stop(&grad, 1.0, "#0000ff")?;
        assert_eq!(generate(&mut ctx), "");
        Ok(())
    }

    #[test]
    fn test_gradient_materialization_order() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        let grad = ctx.create_linear_gradient(0.0, 0.0, 100.0, 0.0)?;
        ctx.add_color_stop(&grad, 0.0, "#ff0000")?;
        ctx.add_color_stop(&grad, 1.0, "#0000ff")?;
        ctx.set_fill_style(grad)?;
        assert_eq!(
            generate(&mut ctx),
            "let g0=ctx.createLinearGradient(0, 0, 100, 0);\n\
             g0.addColorStop(0, \"#ff0000\");\n\
             g0.addColorStop(1, \"#0000ff\");\n\
             ctx.fillStyle=g0;"
        );
        Ok(())
    }

    #[test]
    fn test_mutator_after_materialization() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        let grad = ctx.create_radial_gradient(5.0, 5.0, 0.0, 5.0, 5.0, 10.0)?;
        ctx.set_stroke_style(grad.clone())?;
        ctx.add_color_stop(&grad, 0.5, "#00ff00")?;
        assert_eq!(
            generate(&mut ctx),
            "let g0=ctx.createRadialGradient(5, 5, 0, 5, 5, 10);\n\
             ctx.strokeStyle=g0;\n\
             g0.addColorStop(0.5, \"#00ff00\");"
        );
        Ok(())
    }

    #[test]
    fn test_pattern_transform_pending() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        let pattern = ctx.create_pattern("tile.png", "repeat")?;
        let matrix = Value::Map(vec![
            ("a".to_string(), Value::Num(2.0)),
            ("d".to_string(), Value::Num(2.0)),
        ]);
        ctx.set_pattern_transform(&pattern, matrix)?;
        ctx.set_fill_style(pattern)?;
        assert_eq!(
            generate(&mut ctx),
            "let p0=ctx.createPattern(\"tile.png\", \"repeat\");\n\
             p0.setTransform({\"a\":2,\"d\":2});\n\
             ctx.fillStyle=p0;"
        );
        Ok(())
    }

    #[test]
    fn test_image_data_materialized_by_draw() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        let data = ctx.create_image_data(2.0, 2.0)?;
        ctx.put_image_data(&data, 0.0, 0.0)?;
        assert_eq!(
            generate(&mut ctx),
            "let d0=ctx.createImageData(2, 2);\nctx.putImageData(d0, 0, 0);"
        );
        Ok(())
    }

    #[test]
    fn test_variable_counter_is_shared() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        let grad = ctx.create_linear_gradient(0.0, 0.0, 1.0, 0.0)?;
        let pattern = ctx.create_pattern("tile.png", "repeat")?;
        ctx.set_fill_style(grad)?;
        ctx.set_stroke_style(pattern)?;
        assert_eq!(
            generate(&mut ctx),
            "let g0=ctx.createLinearGradient(0, 0, 1, 0);\n\
             ctx.fillStyle=g0;\n\
             let p1=ctx.createPattern(\"tile.png\", \"repeat\");\n\
             ctx.strokeStyle=p1;"
        );
        Ok(())
    }

    #[test]
    fn test_lazy_validation() -> Result<(), SurfaceError> {
        // an unencodable constructor argument only fails once the object
        // is actually bound
        let mut ctx = Context2d::new(100.0, 100.0);
        let grad = ctx.create_linear_gradient(Scalar::NAN, 0.0, 1.0, 0.0)?;
        assert!(matches!(
            ctx.set_fill_style(grad),
            Err(SurfaceError::Encode(EncodeError::NonFinite(_)))
        ));

        let mut ctx = Context2d::new(100.0, 100.0);
        let _unused = ctx.create_linear_gradient(Scalar::NAN, 0.0, 1.0, 0.0)?;
        assert_eq!(generate(&mut ctx), "");
        Ok(())
    }

    #[test]
    fn test_state_assignment() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        assert_eq!(ctx.get("lineWidth"), Some(&Value::Num(1.0)));
        ctx.set_line_width(4.0)?;
        ctx.set_fill_style("#102030")?;
        ctx.set("unknownProperty", Value::Num(7.0))?; // tolerated, inert
        assert_eq!(ctx.get("lineWidth"), Some(&Value::Num(4.0)));
        assert_eq!(ctx.get("unknownProperty"), None);
        assert_eq!(
            generate(&mut ctx),
            "ctx.lineWidth=4;\nctx.fillStyle=\"#102030\";"
        );
        Ok(())
    }

    #[test]
    fn test_save_restore_recorded() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        ctx.save()?;
        ctx.set_global_alpha(0.5)?;
        ctx.restore()?;
        assert_eq!(
            generate(&mut ctx),
            "ctx.save();\nctx.globalAlpha=0.5;\nctx.restore();"
        );
        Ok(())
    }

    #[test]
    fn test_line_dash_list() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        ctx.set_line_dash(&[4.0, 2.0])?;
        assert_eq!(generate(&mut ctx), "ctx.setLineDash([4,2]);");
        Ok(())
    }

    #[test]
    fn test_circle_fill() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        ctx.begin_path()?;
        ctx.arc(50.0, 50.0, 40.0, 0.0, 2.0 * PI, false)?;
        ctx.fill()?;
        assert_eq!(
            generate(&mut ctx),
            "ctx.beginPath();\n\
             ctx.arc(50, 50, 40, 0, 6.283185307179586, false);\n\
             ctx.fill();"
        );
        Ok(())
    }

    #[test]
    fn test_unknown_operation_is_tolerated() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        assert_eq!(ctx.call("requestFancyFeature", &[Value::Num(1.0)])?, None);
        assert_eq!(generate(&mut ctx), "");
        Ok(())
    }

    #[test]
    fn test_unsupported_operation_is_fatal() {
        let mut ctx = Context2d::new(100.0, 100.0);
        assert_eq!(
            ctx.call("getImageData", &[Value::Num(0.0)]),
            Err(SurfaceError::Unsupported("getImageData"))
        );
    }

    #[test]
    fn test_finalization() -> Result<(), SurfaceError> {
        let mut ctx = Context2d::new(100.0, 100.0);
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0)?;
        assert!(!ctx.is_finalized());

        let mut code = CodeBuilder::new();
        ctx.generate(&mut code)?;
        assert!(ctx.is_finalized());

        assert_eq!(ctx.move_to(0.0, 0.0), Err(SurfaceError::Finalized));
        assert_eq!(
            ctx.set_fill_style("#000000"),
            Err(SurfaceError::Finalized)
        );
        let mut again = CodeBuilder::new();
        assert_eq!(ctx.generate(&mut again), Err(SurfaceError::Finalized));
        Ok(())
    }

    #[test]
    fn test_surface_size() {
        let ctx = Context2d::new(320.0, 200.0);
        assert_eq!(ctx.width(), 320.0);
        assert_eq!(ctx.height(), 200.0);
        assert_eq!(ctx.instruction_count(), 0);
    }
}
