//! Ordered, indentation-aware buffer of generated source statements
const INDENT: &str = "    ";

/// Append-only statement buffer.
///
/// Lines are indented at append time by the current depth; nothing ever
/// removes or reorders a line that was already appended.
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
    lines: Vec<String>,
    depth: usize,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase indentation for subsequent lines
    pub fn indent(&mut self) {
        self.depth += 1;
    }

    /// Decrease indentation for subsequent lines
    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Append a raw statement at the current indentation
    pub fn append(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        let mut out = String::with_capacity(self.depth * INDENT.len() + line.len());
        for _ in 0..self.depth {
            out.push_str(INDENT);
        }
        out.push_str(line);
        self.lines.push(out);
    }

    /// Append a call statement: `target.name(arg, ...);`
    pub fn call(&mut self, target: &str, name: &str, args: &[String]) {
        self.append(format!("{}.{}({});", target, name, args.join(", ")));
    }

    /// Append an assignment statement: `target.property=value;`
    pub fn assign(&mut self, target: &str, property: &str, value: &str) {
        self.append(format!("{}.{}={};", target, property, value));
    }

    /// Append a constructor binding: `let var=target.name(arg, ...);`
    pub fn let_call(&mut self, var: &str, target: &str, name: &str, args: &[String]) {
        self.append(format!("let {}={}.{}({});", var, target, name, args.join(", ")));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Serialize buffered statements, one per line
    pub fn code(&self) -> String {
        self.lines.join("\n")
    }
}
