//! Diagnostic types and message lookup for the mini-bendu type core.
//!
//! Message data lives in `codes.rs`. Diagnostics are plain values, never
//! exceptions: the core returns them in a `Result`, rendering is a caller
//! concern.

use crate::span::Span;
use serde::Serialize;

mod codes;
pub use codes::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// Related information for a diagnostic (e.g. "other declaration here").
#[derive(Clone, Debug, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub span: Span,
    pub message_text: String,
}

/// A structured diagnostic produced by the solver or alias registry.
///
/// Every error kind in the core (§7) is reported as one of
/// these rather than as a Rust exception type.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub span: Span,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    #[must_use]
    pub fn error(file: impl Into<String>, span: Span, message: impl Into<String>, code: u32) -> Self {
        Self {
            file: file.into(),
            span,
            message_text: message.into(),
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_related(mut self, file: impl Into<String>, span: Span, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file: file.into(),
            span,
            message_text: message.into(),
        });
        self
    }
}

/// Format a diagnostic message by replacing `{0}`, `{1}`, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition: code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}
