//! Common types shared across the mini-bendu type-inference crates.
//!
//! - Source spans (`Span`, `Spanned`, `SpanBuilder`, `ByteSpan`)
//! - Position/Range/Location types for line/column source locations
//! - Structured diagnostics (`Diagnostic`, `DiagnosticCategory`, message data)
//! - Centralized limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{ByteSpan, Span, SpanBuilder, Spanned};

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Location, Position, Range, SourceLocation};

// Structured diagnostics
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

// Centralized limits and thresholds
pub mod limits;
