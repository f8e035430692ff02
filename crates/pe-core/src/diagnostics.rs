use crate::span::Span;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

/// Built-in templates supported by the diagnostic manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticTemplate {
    Pretty,
    Plain,
}

/// Runtime configuration for emitting diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticDisplayOptions {
    pub template: DiagnosticTemplate,
    pub verbose_info: bool,
}

impl DiagnosticDisplayOptions {
    pub fn pretty(verbose_info: bool) -> Self {
        Self {
            template: DiagnosticTemplate::Pretty,
            verbose_info,
        }
    }

    pub fn plain(verbose_info: bool) -> Self {
        Self {
            template: DiagnosticTemplate::Plain,
            verbose_info,
        }
    }
}

impl Default for DiagnosticDisplayOptions {
    fn default() -> Self {
        DiagnosticDisplayOptions::pretty(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub span: Option<Span>,
    pub suggestions: Vec<String>,
    pub source_context: Option<String>,
    pub code: Option<String>,
}

impl Diagnostic {
    fn with_level(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            span: None,
            suggestions: Vec::new(),
            source_context: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Info, message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source_context(mut self, context: impl Into<String>) -> Self {
        self.source_context = Some(context.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }

        if !self.suggestions.is_empty() {
            write!(f, " (hints: {})", self.suggestions.join("; "))?;
        }

        Ok(())
    }
}

/// Thread-safe sink for diagnostics produced while walking a compilation unit.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticManager {
    diagnostics: Arc<Mutex<Vec<Diagnostic>>>,
}

impl DiagnosticManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_diagnostic(&self, diagnostic: Diagnostic) {
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(diagnostic);
        }
    }

    pub fn get_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .lock()
            .map(|d| d.iter().any(|diag| diag.level == DiagnosticLevel::Error))
            .unwrap_or(false)
    }

    pub fn clear(&self) {
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.clear();
        }
    }

    /// Render diagnostics to stderr. The fallback context is used when a
    /// diagnostic does not name its own.
    pub fn emit(
        diagnostics: &[Diagnostic],
        fallback_context: Option<&str>,
        options: &DiagnosticDisplayOptions,
    ) {
        for diagnostic in diagnostics {
            let context = diagnostic
                .source_context
                .as_deref()
                .or(fallback_context)
                .unwrap_or("pure-eval");
            for line in render(diagnostic, context, options) {
                eprintln!("{}", line);
            }
        }
    }
}

/// Render one diagnostic into output lines; info diagnostics are hidden unless
/// `verbose_info` is set.
pub fn render(
    diagnostic: &Diagnostic,
    context: &str,
    options: &DiagnosticDisplayOptions,
) -> Vec<String> {
    if diagnostic.level == DiagnosticLevel::Info && !options.verbose_info {
        return Vec::new();
    }

    let level = match (options.template, diagnostic.level) {
        (DiagnosticTemplate::Pretty, DiagnosticLevel::Error) => "error",
        (DiagnosticTemplate::Pretty, DiagnosticLevel::Warning) => "warning",
        (DiagnosticTemplate::Pretty, DiagnosticLevel::Info) => "note",
        (DiagnosticTemplate::Plain, DiagnosticLevel::Error) => "ERROR",
        (DiagnosticTemplate::Plain, DiagnosticLevel::Warning) => "WARNING",
        (DiagnosticTemplate::Plain, DiagnosticLevel::Info) => "INFO",
    };

    let header = match (options.template, diagnostic.code.as_ref()) {
        (DiagnosticTemplate::Pretty, Some(code)) => {
            format!("{}[{}]: {} ({})", level, context, diagnostic.message, code)
        }
        (DiagnosticTemplate::Pretty, None) => {
            format!("{}[{}]: {}", level, context, diagnostic.message)
        }
        (DiagnosticTemplate::Plain, Some(code)) => {
            format!("[{}] {}: {} ({})", context, level, diagnostic.message, code)
        }
        (DiagnosticTemplate::Plain, None) => {
            format!("[{}] {}: {}", context, level, diagnostic.message)
        }
    };

    let mut lines = vec![header];
    if let Some(span) = &diagnostic.span {
        lines.push(format!("   at {}", span));
    }
    for suggestion in &diagnostic.suggestions {
        lines.push(format!("   suggestion: {}", suggestion));
    }
    lines
}
