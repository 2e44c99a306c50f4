//! The constraint generator (§4.4): walks the AST under a type environment,
//! minting fresh variables and emitting constraints.

use crate::alias::AliasRegistry;
use crate::ast::{ArithOp, Expr, ExprKind, Literal, RecordEntry, UnaryOp};
use crate::constraint::{Constraint, Constraints};
use crate::env::{generalize, Env, Scheme};
use crate::error::TypeError;
use crate::pattern::type_pattern;
use crate::types::{Level, Primitive, RecordType, Type, VarGen};
use bendu_common::limits::RECORD_FIELD_CAPACITY_HINT;
use indexmap::IndexMap;

fn literal_type(lit: &Literal) -> Type {
    match lit {
        Literal::Int(_) => Type::Primitive(Primitive::Int),
        Literal::Float(_) => Type::Primitive(Primitive::Float),
        Literal::String(s) => Type::Literal(s.clone()),
        Literal::Char(_) => Type::Primitive(Primitive::Char),
        Literal::Bool(_) => Type::Primitive(Primitive::Bool),
        Literal::Unit => Type::Primitive(Primitive::Unit),
    }
}

fn arith_domain(op: ArithOp) -> Type {
    match op {
        // §4.4: "per the operator's declared domain" — this implementation
        // fixes every arithmetic operator to `Int`; a richer operator table
        // (Float/Char variants) is future work, not part of this core.
        ArithOp::Add | ArithOp::Sub | ArithOp::Mul | ArithOp::Div => Type::Primitive(Primitive::Int),
    }
}

/// Walk `expr` under `env`, returning its inferred type and the constraints
/// generated along the way. Undefined-name errors abort immediately (§7
/// propagation policy); every other failure is deferred to the solver as a
/// constraint. `aliases` is populated in place by any alias definition
/// encountered (§4.4: "delegated to the Alias Registry, §4.6").
pub fn generate(
    expr: &Expr,
    env: &Env,
    vgen: &VarGen,
    level: Level,
    aliases: &mut AliasRegistry,
) -> Result<(Type, Constraints), TypeError> {
    let mut constraints = Constraints::new();
    let ty = generate_into(expr, env, vgen, level, aliases, &mut constraints)?;
    Ok((ty, constraints))
}

fn generate_into(
    expr: &Expr,
    env: &Env,
    vgen: &VarGen,
    level: Level,
    aliases: &mut AliasRegistry,
    out: &mut Constraints,
) -> Result<Type, TypeError> {
    match &expr.kind {
        ExprKind::Literal(lit) => Ok(literal_type(lit)),

        ExprKind::Var(name) => match env.lookup(name) {
            Some(scheme) => Ok(scheme.instantiate(vgen, level)),
            None => Err(TypeError::UndefinedName {
                name: name.clone(),
                span: expr.span,
            }),
        },

        ExprKind::Lambda {
            param,
            annotation,
            body,
        } => {
            let param_ty = vgen.fresh_type(level);
            if let Some(ann) = annotation {
                out.push(Constraint::equality(param_ty.clone(), ann.clone(), expr.span));
            }
            let inner_env = env.bind_mono(param.clone(), param_ty.clone());
            let body_ty = generate_into(body, &inner_env, vgen, level, aliases, out)?;
            Ok(Type::function(param_ty, body_ty))
        }

        ExprKind::Apply { func, arg } => {
            let func_ty = generate_into(func, env, vgen, level, aliases, out)?;
            let arg_ty = generate_into(arg, env, vgen, level, aliases, out)?;
            let result_ty = vgen.fresh_type(level);
            out.push(Constraint::equality(
                func_ty,
                Type::function(arg_ty, result_ty.clone()),
                expr.span,
            ));
            Ok(result_ty)
        }

        ExprKind::Let {
            name,
            annotation,
            recursive,
            init,
            body,
        } => {
            let inner_level = level.deeper();
            // The initializer's own constraints are solved immediately,
            // before generalizing (§8 "Principal type", §9 "Generalization
            // boundaries"): generalizing over an unsolved type would
            // quantify variables a constraint has already pinned down, e.g.
            // `let bad = \x. x + 1 in bad` must generalize to `Int -> Int`,
            // not `forall a. a -> Int`.
            let mut init_constraints = Constraints::new();
            let (init_ty, bound_env) = if *recursive {
                let placeholder = vgen.fresh_type(inner_level);
                let rec_env = env.bind_mono(name.clone(), placeholder.clone());
                let inferred = generate_into(init, &rec_env, vgen, inner_level, aliases, &mut init_constraints)?;
                init_constraints.push(Constraint::equality(placeholder, inferred.clone(), expr.span));
                (inferred, env.clone())
            } else {
                let inferred = generate_into(init, env, vgen, inner_level, aliases, &mut init_constraints)?;
                (inferred, env.clone())
            };
            if let Some(ann) = annotation {
                init_constraints.push(Constraint::equality(init_ty.clone(), ann.clone(), expr.span));
            }
            let local_subst = crate::solve::solve(init_constraints.clone(), &*aliases, vgen)?;
            let resolved_init_ty = local_subst.apply(&init_ty);
            out.extend(init_constraints);
            // Generalization happens only for non-recursive top-level-style
            // bindings (§4.4); the binding is always visible in the body
            // either way, polymorphic or not.
            let scheme = if body.is_some() {
                generalize(&bound_env, &resolved_init_ty)
            } else {
                Scheme::monomorphic(resolved_init_ty.clone())
            };
            let body_env = bound_env.bind(name.clone(), scheme);
            match body {
                Some(body_expr) => generate_into(body_expr, &body_env, vgen, level, aliases, out),
                None => Ok(resolved_init_ty),
            }
        }

        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let cond_ty = generate_into(cond, env, vgen, level, aliases, out)?;
            out.push(Constraint::equality(
                cond_ty,
                Type::Primitive(Primitive::Bool),
                expr.span,
            ));
            let then_ty = generate_into(then_branch, env, vgen, level, aliases, out)?;
            let else_ty = generate_into(else_branch, env, vgen, level, aliases, out)?;
            out.push(Constraint::equality(then_ty.clone(), else_ty, expr.span));
            Ok(then_ty)
        }

        ExprKind::Arith { op, left, right } => {
            let domain = arith_domain(*op);
            let left_ty = generate_into(left, env, vgen, level, aliases, out)?;
            let right_ty = generate_into(right, env, vgen, level, aliases, out)?;
            out.push(Constraint::equality(left_ty, domain.clone(), expr.span));
            out.push(Constraint::equality(right_ty, domain.clone(), expr.span));
            Ok(domain)
        }

        ExprKind::Compare { op: _, left, right } => {
            let left_ty = generate_into(left, env, vgen, level, aliases, out)?;
            let right_ty = generate_into(right, env, vgen, level, aliases, out)?;
            out.push(Constraint::equality(left_ty.clone(), right_ty, expr.span));
            out.push(Constraint::instance("Comparable", left_ty, expr.span));
            Ok(Type::Primitive(Primitive::Bool))
        }

        ExprKind::Logical { op: _, left, right } => {
            let left_ty = generate_into(left, env, vgen, level, aliases, out)?;
            let right_ty = generate_into(right, env, vgen, level, aliases, out)?;
            out.push(Constraint::equality(
                left_ty,
                Type::Primitive(Primitive::Bool),
                expr.span,
            ));
            out.push(Constraint::equality(
                right_ty,
                Type::Primitive(Primitive::Bool),
                expr.span,
            ));
            Ok(Type::Primitive(Primitive::Bool))
        }

        ExprKind::Unary { op, operand } => {
            let operand_ty = generate_into(operand, env, vgen, level, aliases, out)?;
            let expected = match op {
                UnaryOp::Neg => Type::Primitive(Primitive::Int),
                UnaryOp::Not => Type::Primitive(Primitive::Bool),
            };
            out.push(Constraint::equality(operand_ty, expected.clone(), expr.span));
            Ok(expected)
        }

        ExprKind::Tuple(elems) => {
            let elem_types = elems
                .iter()
                .map(|e| generate_into(e, env, vgen, level, aliases, out))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Type::Tuple(elem_types))
        }

        ExprKind::Record(entries) => generate_record(entries, env, vgen, level, aliases, out, expr.span),

        ExprKind::FieldAccess { target, field } => {
            let target_ty = generate_into(target, env, vgen, level, aliases, out)?;
            let field_ty = vgen.fresh_type(level);
            let row = vgen.fresh(level);
            let mut fields = IndexMap::with_capacity(1);
            fields.insert(field.clone(), field_ty.clone());
            out.push(Constraint::equality(
                target_ty,
                Type::Record(RecordType::open(fields, row)),
                expr.span,
            ));
            Ok(field_ty)
        }

        ExprKind::Match { scrutinee, arms } => {
            generate_match(scrutinee, arms, env, vgen, level, aliases, out, expr.span)
        }

        ExprKind::AliasDef { name, params, body } => {
            let param_ids = params.iter().map(|_| vgen.fresh(level).id).collect();
            aliases.define(name.clone(), param_ids, body.clone())?;
            Ok(Type::Primitive(Primitive::Unit))
        }

        ExprKind::Annotate { expr: inner, annotation } => {
            let inner_ty = generate_into(inner, env, vgen, level, aliases, out)?;
            out.push(Constraint::equality(inner_ty, annotation.clone(), expr.span));
            Ok(annotation.clone())
        }
    }
}

/// §4.4 "Record literal": fields accumulate left-to-right, later fields
/// shadowing earlier ones of the same name (with an equality constraint
/// still emitted between the two so incompatible overrides fail); a spread
/// contributes its own fields plus an open tail, and the composite result
/// is open iff any spread was present.
fn generate_record(
    entries: &[RecordEntry],
    env: &Env,
    vgen: &VarGen,
    level: Level,
    aliases: &mut AliasRegistry,
    out: &mut Constraints,
    span: bendu_common::Span,
) -> Result<Type, TypeError> {
    let mut fields: IndexMap<String, Type> = IndexMap::with_capacity(RECORD_FIELD_CAPACITY_HINT);
    let mut saw_spread = false;
    for entry in entries {
        match entry {
            RecordEntry::Field { name, value } => {
                let value_ty = generate_into(value, env, vgen, level, aliases, out)?;
                if let Some(existing) = fields.get(name) {
                    out.push(Constraint::equality(existing.clone(), value_ty.clone(), span));
                }
                fields.insert(name.clone(), value_ty);
            }
            RecordEntry::Spread(spread_expr) => {
                saw_spread = true;
                let spread_ty = generate_into(spread_expr, env, vgen, level, aliases, out)?;
                let row = vgen.fresh(level);
                out.push(Constraint::equality(
                    spread_ty,
                    Type::Record(RecordType::open(fields.clone(), row)),
                    span,
                ));
            }
        }
    }
    if saw_spread {
        let row = vgen.fresh(level);
        Ok(Type::Record(RecordType::open(fields, row)))
    } else {
        Ok(Type::Record(RecordType::closed(fields)))
    }
}

/// §4.4 "Match": every arm's body is constrained to a single shared result
/// type, unless all arm bodies are literal string types, in which case the
/// generator produces their union rather than forcing them equal (§9 "Union
/// of match-arm bodies").
fn generate_match(
    scrutinee: &crate::ast::Expr,
    arms: &[crate::ast::MatchArm],
    env: &Env,
    vgen: &VarGen,
    level: Level,
    aliases: &mut AliasRegistry,
    out: &mut Constraints,
    span: bendu_common::Span,
) -> Result<Type, TypeError> {
    if arms.is_empty() {
        generate_into(scrutinee, env, vgen, level, aliases, out)?;
        return Ok(Type::Primitive(Primitive::Unit));
    }
    let scrutinee_ty = generate_into(scrutinee, env, vgen, level, aliases, out)?;
    let mut arm_types = Vec::with_capacity(arms.len());
    for arm in arms {
        let arm_env = type_pattern(&arm.pattern, &scrutinee_ty, env, vgen, level, out);
        let body_ty = generate_into(&arm.body, &arm_env, vgen, level, aliases, out)?;
        arm_types.push(body_ty);
    }
    if arm_types.iter().all(Type::is_string_literal_union) {
        return Ok(Type::union(arm_types));
    }
    let result = vgen.fresh_type(level);
    for arm_ty in arm_types {
        out.push(Constraint::equality(result.clone(), arm_ty, span));
    }
    Ok(result)
}
