// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Lowers a resolved label to a Python expression over `record`.

use crate::ast::LiteralKind;
use crate::error::EmitError;
use crate::typechecker::{FieldChain, ResolvedExpr};

use super::{LabelEmitter, RECORD_VAR, TargetLanguage, expect_arity};

pub struct PythonEmitter;

impl LabelEmitter for PythonEmitter {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::Python
    }

    fn emit(&self, expr: &ResolvedExpr) -> Result<String, EmitError> {
        emit_expr(expr)
    }
}

fn emit_expr(expr: &ResolvedExpr) -> Result<String, EmitError> {
    match expr {
        ResolvedExpr::Literal { value, kind } => Ok(match kind {
            LiteralKind::Str => format!("\"{value}\""),
            LiteralKind::Int | LiteralKind::Float => value.clone(),
        }),
        ResolvedExpr::FieldRef(chain) => Ok(access(chain)),
        ResolvedExpr::Call { op, args } => call(op, args),
    }
}

/// Attribute access with a guard for every nullable intermediate: the whole
/// access evaluates to `None` when any guarded hop is absent.
fn access(chain: &FieldChain) -> String {
    let mut path = RECORD_VAR.to_string();
    let mut guards = vec![];

    for (index, segment) in chain.segments.iter().enumerate() {
        path = format!("{path}.{}", segment.field);
        if index + 1 < chain.segments.len() && segment.nullable {
            guards.push(format!("{path} is not None"));
        }
    }

    if guards.is_empty() {
        path
    } else {
        format!("({path} if {} else None)", guards.join(" and "))
    }
}

fn call(op: &str, args: &[ResolvedExpr]) -> Result<String, EmitError> {
    match op {
        "concat" => {
            let pieces = args
                .iter()
                .map(concat_piece)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(pieces.join(" + "))
        }
        "if" => {
            expect_arity(op, args, 3)?;
            let cond = emit_expr(&args[0])?;
            let then = emit_expr(&args[1])?;
            let otherwise = emit_expr(&args[2])?;
            Ok(format!(
                "({then} if {cond} is not None and {cond} != \"\" else {otherwise})"
            ))
        }
        "upper" => {
            expect_arity(op, args, 1)?;
            Ok(format!("str({}).upper()", emit_expr(&args[0])?))
        }
        "lower" => {
            expect_arity(op, args, 1)?;
            Ok(format!("str({}).lower()", emit_expr(&args[0])?))
        }
        "is_none" => {
            expect_arity(op, args, 3)?;
            let cond = emit_expr(&args[0])?;
            let then = emit_expr(&args[1])?;
            let otherwise = emit_expr(&args[2])?;
            Ok(format!("({then} if {cond} is None else {otherwise})"))
        }
        "=" => {
            expect_arity(op, args, 4)?;
            let left = emit_expr(&args[0])?;
            let right = emit_expr(&args[1])?;
            let then = emit_expr(&args[2])?;
            let otherwise = emit_expr(&args[3])?;
            Ok(format!("({then} if {left} == {right} else {otherwise})"))
        }
        "date_str" => {
            expect_arity(op, args, 2)?;
            let value = emit_expr(&args[0])?;
            let fmt = emit_expr(&args[1])?;
            Ok(format!("{value}.strftime({fmt})"))
        }
        "float_str" => {
            expect_arity(op, args, 2)?;
            let value = emit_expr(&args[0])?;
            let digits = emit_expr(&args[1])?;
            Ok(format!(
                "(\"{{:.\" + str({digits}) + \"f}}\").format({value})"
            ))
        }
        "int_str" => {
            expect_arity(op, args, 1)?;
            Ok(format!("\"{{:,}}\".format({})", emit_expr(&args[0])?))
        }
        _ => Err(EmitError::UnsupportedOperator {
            operator: op.to_string(),
        }),
    }
}

/// One `concat` operand. Literals contribute their text verbatim; anything
/// else is stringified, with null and empty collapsing to `""` so a missing
/// operand never poisons the whole label.
fn concat_piece(arg: &ResolvedExpr) -> Result<String, EmitError> {
    match arg {
        ResolvedExpr::Literal { value, .. } => Ok(format!("\"{value}\"")),
        _ => {
            let piece = emit_expr(arg)?;
            Ok(format!(
                "(\"\" if {piece} is None or {piece} == \"\" else str({piece}))"
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::typechecker::resolve;
    use core_model::{Dataset, Field, FieldType, Resource};

    fn dataset() -> Dataset {
        let mut company = Resource::new("Company");
        company.fields = vec![Field::scalar("name", FieldType::String)];

        let mut contact = Resource::new("Contact");
        contact.fields = vec![
            Field::scalar("id", FieldType::Integer),
            Field::scalar("name", FieldType::String),
            Field::scalar("price", FieldType::Float),
            Field {
                nullable: true,
                ref_target: Some("Company".into()),
                ..Field::scalar("employer", FieldType::ManyToOne)
            },
        ];

        Dataset::from_resources("t", [company, contact])
    }

    fn emit(label: &str) -> Result<String, EmitError> {
        let ds = dataset();
        let contact = ds.get("Contact").unwrap();
        let resolved = resolve(&ds, contact, &parse(label).unwrap()).unwrap();
        PythonEmitter.emit(&resolved)
    }

    #[test]
    fn concat_wraps_field_operands() {
        insta::assert_snapshot!(
            emit("(concat name)").unwrap(),
            @r#"("" if record.name is None or record.name == "" else str(record.name))"#
        );
    }

    #[test]
    fn fallback_label() {
        insta::assert_snapshot!(
            emit(r#"(if name name (concat "ID:" " " id))"#).unwrap(),
            @r#"(record.name if record.name is not None and record.name != "" else "ID:" + " " + ("" if record.id is None or record.id == "" else str(record.id)))"#
        );
    }

    #[test]
    fn guarded_chain_emits_none_safe_access() {
        insta::assert_snapshot!(
            emit("(is_none employer.name \"-\" employer.name)").unwrap(),
            @r#"("-" if (record.employer.name if record.employer is not None else None) is None else (record.employer.name if record.employer is not None else None))"#
        );
    }

    #[test]
    fn numeric_formatting() {
        insta::assert_snapshot!(
            emit("(float_str price 2)").unwrap(),
            @r#"("{:." + str(2) + "f}").format(record.price)"#
        );
        insta::assert_snapshot!(
            emit("(int_str id)").unwrap(),
            @r#""{:,}".format(record.id)"#
        );
    }

    #[test]
    fn case_operators() {
        insta::assert_snapshot!(emit("(upper name)").unwrap(), @"str(record.name).upper()");
        insta::assert_snapshot!(emit("(lower name)").unwrap(), @"str(record.name).lower()");
    }

    #[test]
    fn unknown_operator_is_rejected() {
        assert_eq!(
            emit("(reverse name)").unwrap_err(),
            EmitError::UnsupportedOperator {
                operator: "reverse".into()
            }
        );
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert_eq!(
            emit("(upper name id)").unwrap_err(),
            EmitError::Arity {
                operator: "upper".into(),
                expected: 1,
                found: 2
            }
        );
    }
}
