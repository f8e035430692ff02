//! Go caller synthesis: a `package main` that calls one function and prints its result.

use itertools::Itertools;
use pe_core::ir::{ConstValue, FunctionRef};
use pe_core::{unsupported, ProgramSynthesizer, Result, SynthesizedProgram};

use crate::literal::render_value;

/// Qualifier the target package is imported under. A fixed alias keeps the call
/// expression independent of the package's declared name and never collides with `fmt`.
pub const TARGET_ALIAS: &str = "target";

/// Synthesizes the caller program handed to `go run`.
#[derive(Clone, Debug, Default)]
pub struct GoCallerSynthesizer;

impl GoCallerSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

impl ProgramSynthesizer for GoCallerSynthesizer {
    fn language(&self) -> &str {
        "go"
    }

    fn synthesize(&self, func: &FunctionRef, args: &[ConstValue]) -> Result<SynthesizedProgram> {
        check_import_path(&func.module_path)?;
        if !is_identifier(&func.name) {
            unsupported!("`{}` is not a Go identifier", func.name);
        }
        let rendered = args.iter().map(render_value).collect::<Result<Vec<_>>>()?;

        let mut emitter = GoEmitter::new();
        emitter.push_line("package main");
        emitter.push_blank_line();
        emitter.push_line("import (");
        emitter.indent += 1;
        emitter.push_line("\"fmt\"");
        emitter.push_blank_line();
        emitter.push_line(&format!("{} \"{}\"", TARGET_ALIAS, func.module_path));
        emitter.indent -= 1;
        emitter.push_line(")");
        emitter.push_blank_line();
        emitter.push_line("func main() {");
        emitter.indent += 1;
        emitter.push_line(&format!(
            "result := {}.{}({})",
            TARGET_ALIAS,
            func.name,
            rendered.iter().join(", ")
        ));
        emitter.push_line("fmt.Print(result)");
        emitter.indent -= 1;
        emitter.push_line("}");

        Ok(SynthesizedProgram::new(emitter.finish()))
    }

    fn render_literal(&self, value: &ConstValue) -> Result<String> {
        render_value(value)
    }
}

struct GoEmitter {
    code: String,
    indent: usize,
}

impl GoEmitter {
    fn new() -> Self {
        Self {
            code: String::new(),
            indent: 0,
        }
    }

    fn finish(self) -> String {
        self.code
    }

    fn push_line(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.code.push('\t');
        }
        self.code.push_str(line);
        self.code.push('\n');
    }

    fn push_blank_line(&mut self) {
        self.code.push('\n');
    }
}

/// Go identifier: a letter or `_` followed by letters, digits or `_`; not a keyword or blank.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return false;
    }
    name != "_" && !GO_KEYWORDS.contains(&name)
}

const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

fn check_import_path(path: &str) -> Result<()> {
    if path.is_empty() {
        unsupported!("empty import path");
    }
    if path == "main" {
        unsupported!("functions of package main cannot be imported");
    }
    const DISALLOWED: &str = "!\"#$%&'()*,:;<=>?[\\]^`{|}";
    if let Some(bad) = path.chars().find(|c| {
        c.is_whitespace() || c.is_control() || DISALLOWED.contains(*c) || *c == '\u{fffd}'
    }) {
        unsupported!("import path {:?} contains {:?}", path, bad);
    }
    Ok(())
}
