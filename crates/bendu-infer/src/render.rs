//! Pretty-printing types into the source language's own notation (§7):
//! `Int -> String`, `{ x: Int | rho }`, etc. Kept separate from the `Type`
//! algebra itself — rendering is a diagnostics concern, not a core one.

use crate::types::Type;

#[must_use]
pub fn render_type(ty: &Type) -> String {
    let mut out = String::new();
    render_into(ty, &mut out, false);
    out
}

fn render_into(ty: &Type, out: &mut String, parenthesize_fn: bool) {
    match ty {
        Type::Primitive(p) => out.push_str(p.name()),
        Type::Literal(lit) => {
            out.push('"');
            out.push_str(lit);
            out.push('"');
        }
        Type::Var(v) => out.push_str(&var_name(v.id.0)),
        Type::Function(dom, cod) => {
            if parenthesize_fn {
                out.push('(');
            }
            render_into(dom, out, matches!(dom.as_ref(), Type::Function(..)));
            out.push_str(" -> ");
            render_into(cod, out, false);
            if parenthesize_fn {
                out.push(')');
            }
        }
        Type::Tuple(elems) => {
            out.push('(');
            for (i, elem) in elems.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_into(elem, out, false);
            }
            out.push(')');
        }
        Type::Record(rec) => {
            out.push_str("{ ");
            for (i, (name, field_ty)) in rec.fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(name);
                out.push_str(": ");
                render_into(field_ty, out, false);
            }
            if let Some(row) = rec.row {
                if !rec.fields.is_empty() {
                    out.push_str(" | ");
                } else {
                    out.push_str("| ");
                }
                out.push_str(&row_name(row.id.0));
            }
            out.push_str(" }");
        }
        Type::Union(members) => render_joined(members, out, " | "),
        Type::Intersection(members) => render_joined(members, out, " & "),
        Type::Alias(alias) => {
            out.push_str(&alias.name);
            if !alias.args.is_empty() {
                out.push('[');
                for (i, arg) in alias.args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    render_into(arg, out, false);
                }
                out.push(']');
            }
        }
    }
}

fn render_joined(members: &[Type], out: &mut String, sep: &str) {
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        render_into(member, out, true);
    }
}

/// Greek-letter-style names for ordinary type variables (alpha, beta, ...),
/// wrapping to `tN` once the alphabet is exhausted.
fn var_name(id: u32) -> String {
    const GREEK: [&str; 19] = [
        "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
        "lambda", "mu", "nu", "xi", "omicron", "pi", "sigma", "tau", "upsilon",
    ];
    match GREEK.get(id as usize) {
        Some(name) => (*name).to_string(),
        None => format!("t{id}"),
    }
}

fn row_name(id: u32) -> String {
    format!("rho{id}")
}
