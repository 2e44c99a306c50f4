//! Diagnostic message data for the mini-bendu type core.
//!
//! One entry per error kind named in the error handling design (§7):
//! undefined name, type mismatch, occurs check, field missing, field type
//! conflict, alias cycle, alias arity mismatch, unknown type class — plus
//! the alias-expansion-depth guard this implementation adds (§3 of
//! `SPEC_FULL.md`).

use super::DiagnosticCategory;
use super::DiagnosticMessage;

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: 1,
        category: DiagnosticCategory::Error,
        message: "Cannot find name '{0}'.",
    },
    DiagnosticMessage {
        code: 2,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' is not assignable to type '{1}'.",
    },
    DiagnosticMessage {
        code: 3,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' is circular: it would have to contain itself as a subterm of '{1}'.",
    },
    DiagnosticMessage {
        code: 4,
        category: DiagnosticCategory::Error,
        message: "Property '{0}' is missing in type '{1}'.",
    },
    DiagnosticMessage {
        code: 5,
        category: DiagnosticCategory::Error,
        message: "Property '{0}' has conflicting types '{1}' and '{2}'.",
    },
    DiagnosticMessage {
        code: 6,
        category: DiagnosticCategory::Error,
        message: "Type alias '{0}' is circular via '{1}'.",
    },
    DiagnosticMessage {
        code: 7,
        category: DiagnosticCategory::Error,
        message: "Generic type '{0}' requires {1} type argument(s) but {2} were given.",
    },
    DiagnosticMessage {
        code: 8,
        category: DiagnosticCategory::Error,
        message: "Unknown type class '{0}'.",
    },
    DiagnosticMessage {
        code: 9,
        category: DiagnosticCategory::Error,
        message: "Alias expansion of '{0}' exceeded the maximum depth.",
    },
    DiagnosticMessage {
        code: 10,
        category: DiagnosticCategory::Error,
        message: "Type alias '{0}' is already defined.",
    },
    DiagnosticMessage {
        code: 11,
        category: DiagnosticCategory::Error,
        message: "Constraint solving exceeded the maximum of {0} constraints.",
    },
];

pub mod diagnostic_messages {
    pub const CANNOT_FIND_NAME: &str = "Cannot find name '{0}'.";
    pub const TYPE_NOT_ASSIGNABLE: &str = "Type '{0}' is not assignable to type '{1}'.";
    pub const CIRCULAR_TYPE: &str =
        "Type '{0}' is circular: it would have to contain itself as a subterm of '{1}'.";
    pub const PROPERTY_MISSING: &str = "Property '{0}' is missing in type '{1}'.";
    pub const PROPERTY_TYPE_CONFLICT: &str = "Property '{0}' has conflicting types '{1}' and '{2}'.";
    pub const ALIAS_CYCLE: &str = "Type alias '{0}' is circular via '{1}'.";
    pub const ALIAS_ARITY_MISMATCH: &str =
        "Generic type '{0}' requires {1} type argument(s) but {2} were given.";
    pub const UNKNOWN_TYPE_CLASS: &str = "Unknown type class '{0}'.";
    pub const ALIAS_EXPANSION_TOO_DEEP: &str =
        "Alias expansion of '{0}' exceeded the maximum depth.";
    pub const ALIAS_ALREADY_DEFINED: &str = "Type alias '{0}' is already defined.";
    pub const TOO_MANY_CONSTRAINTS: &str = "Constraint solving exceeded the maximum of {0} constraints.";
}

pub mod diagnostic_codes {
    pub const CANNOT_FIND_NAME: u32 = 1;
    pub const TYPE_NOT_ASSIGNABLE: u32 = 2;
    pub const CIRCULAR_TYPE: u32 = 3;
    pub const PROPERTY_MISSING: u32 = 4;
    pub const PROPERTY_TYPE_CONFLICT: u32 = 5;
    pub const ALIAS_CYCLE: u32 = 6;
    pub const ALIAS_ARITY_MISMATCH: u32 = 7;
    pub const UNKNOWN_TYPE_CLASS: u32 = 8;
    pub const ALIAS_EXPANSION_TOO_DEEP: u32 = 9;
    pub const ALIAS_ALREADY_DEFINED: u32 = 10;
    pub const TOO_MANY_CONSTRAINTS: u32 = 11;
}
