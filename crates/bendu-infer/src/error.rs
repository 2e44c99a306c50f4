//! Structured type errors (§7). None of these are exceptions — they are
//! plain values propagated through `Result`, converted to a
//! `bendu_common::Diagnostic` only at the boundary a caller wants to
//! render one.

use crate::render::render_type;
use crate::types::Type;
use bendu_common::diagnostics::{diagnostic_codes, format_message};
use bendu_common::{Diagnostic, Span};

#[derive(Debug, Clone)]
pub enum TypeError {
    /// §7.1: reference to a name not in the environment.
    UndefinedName { name: String, span: Span },
    /// §7.2: unification failed between two non-variable, non-alias types.
    Mismatch {
        expected: Box<Type>,
        actual: Box<Type>,
        span: Span,
    },
    /// §7.3: a variable would be substituted by a type containing itself.
    OccursCheck {
        var: Box<Type>,
        infinite: Box<Type>,
        span: Span,
    },
    /// §7.4: record unification found a closed record lacking a demanded
    /// field.
    FieldMissing {
        field: String,
        record: Box<Type>,
        span: Span,
    },
    /// §7.5: two records agreed on a field name but its types failed to
    /// unify.
    FieldTypeConflict {
        field: String,
        left: Box<Type>,
        right: Box<Type>,
        span: Span,
    },
    /// §7.6: alias definition would introduce a cycle not broken by a
    /// structural constructor.
    AliasCycle { name: String, via: String },
    /// §4.7: a `define` named an alias that is already bound.
    AliasAlreadyDefined { name: String },
    /// §7.7: alias applied with the wrong number of type arguments
    /// (treated as undefined, per §4.7).
    AliasArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    /// §3 of SPEC_FULL.md: an acyclic but pathologically long alias chain
    /// exceeded the expansion depth guard.
    AliasExpansionTooDeep { name: String },
    /// §7.8: reserved for future use; an instance constraint named an
    /// unrecognized type class.
    UnknownTypeClass { name: String, span: Span },
    /// Constraint generation produced more constraints than the solver will
    /// process for a single top-level inference (`MAX_SOLVER_CONSTRAINTS`).
    TooManyConstraints { count: usize },
}

impl TypeError {
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            TypeError::UndefinedName { span, .. }
            | TypeError::Mismatch { span, .. }
            | TypeError::OccursCheck { span, .. }
            | TypeError::FieldMissing { span, .. }
            | TypeError::FieldTypeConflict { span, .. }
            | TypeError::UnknownTypeClass { span, .. } => Some(*span),
            TypeError::AliasCycle { .. }
            | TypeError::AliasAlreadyDefined { .. }
            | TypeError::AliasArityMismatch { .. }
            | TypeError::AliasExpansionTooDeep { .. }
            | TypeError::TooManyConstraints { .. } => None,
        }
    }

    /// Render this error as a structured `Diagnostic`, naming both
    /// conflicting types in the source language's own notation (§7).
    #[must_use]
    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        let span = self.span().unwrap_or_default();
        match self {
            TypeError::UndefinedName { name, .. } => Diagnostic::error(
                file,
                span,
                format_message(
                    bendu_common::diagnostics::diagnostic_messages::CANNOT_FIND_NAME,
                    &[name],
                ),
                diagnostic_codes::CANNOT_FIND_NAME,
            ),
            TypeError::Mismatch {
                expected, actual, ..
            } => Diagnostic::error(
                file,
                span,
                format_message(
                    bendu_common::diagnostics::diagnostic_messages::TYPE_NOT_ASSIGNABLE,
                    &[&render_type(actual), &render_type(expected)],
                ),
                diagnostic_codes::TYPE_NOT_ASSIGNABLE,
            ),
            TypeError::OccursCheck { var, infinite, .. } => Diagnostic::error(
                file,
                span,
                format_message(
                    bendu_common::diagnostics::diagnostic_messages::CIRCULAR_TYPE,
                    &[&render_type(var), &render_type(infinite)],
                ),
                diagnostic_codes::CIRCULAR_TYPE,
            ),
            TypeError::FieldMissing { field, record, .. } => Diagnostic::error(
                file,
                span,
                format_message(
                    bendu_common::diagnostics::diagnostic_messages::PROPERTY_MISSING,
                    &[field, &render_type(record)],
                ),
                diagnostic_codes::PROPERTY_MISSING,
            ),
            TypeError::FieldTypeConflict {
                field, left, right, ..
            } => Diagnostic::error(
                file,
                span,
                format_message(
                    bendu_common::diagnostics::diagnostic_messages::PROPERTY_TYPE_CONFLICT,
                    &[field, &render_type(left), &render_type(right)],
                ),
                diagnostic_codes::PROPERTY_TYPE_CONFLICT,
            ),
            TypeError::AliasCycle { name, via } => Diagnostic::error(
                file,
                Span::dummy(),
                format_message(
                    bendu_common::diagnostics::diagnostic_messages::ALIAS_CYCLE,
                    &[name, via],
                ),
                diagnostic_codes::ALIAS_CYCLE,
            ),
            TypeError::AliasArityMismatch {
                name,
                expected,
                actual,
            } => Diagnostic::error(
                file,
                Span::dummy(),
                format_message(
                    bendu_common::diagnostics::diagnostic_messages::ALIAS_ARITY_MISMATCH,
                    &[name, &expected.to_string(), &actual.to_string()],
                ),
                diagnostic_codes::ALIAS_ARITY_MISMATCH,
            ),
            TypeError::AliasExpansionTooDeep { name } => Diagnostic::error(
                file,
                Span::dummy(),
                format_message(
                    bendu_common::diagnostics::diagnostic_messages::ALIAS_EXPANSION_TOO_DEEP,
                    &[name],
                ),
                diagnostic_codes::ALIAS_EXPANSION_TOO_DEEP,
            ),
            TypeError::AliasAlreadyDefined { name } => Diagnostic::error(
                file,
                Span::dummy(),
                format_message(
                    bendu_common::diagnostics::diagnostic_messages::ALIAS_ALREADY_DEFINED,
                    &[name],
                ),
                diagnostic_codes::ALIAS_ALREADY_DEFINED,
            ),
            TypeError::UnknownTypeClass { name, .. } => Diagnostic::error(
                file,
                span,
                format_message(
                    bendu_common::diagnostics::diagnostic_messages::UNKNOWN_TYPE_CLASS,
                    &[name],
                ),
                diagnostic_codes::UNKNOWN_TYPE_CLASS,
            ),
            TypeError::TooManyConstraints { count } => Diagnostic::error(
                file,
                Span::dummy(),
                format_message(
                    bendu_common::diagnostics::diagnostic_messages::TOO_MANY_CONSTRAINTS,
                    &[&count.to_string()],
                ),
                diagnostic_codes::TOO_MANY_CONSTRAINTS,
            ),
        }
    }
}
