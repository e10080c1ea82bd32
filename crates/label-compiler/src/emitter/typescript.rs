// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Lowers a resolved label to a TypeScript expression over `record`.
//!
//! Null handling leans on the language: optional chaining after every
//! nullable hop, with `?? null` normalizing `undefined` away so the snippet
//! has the same null surface as its Python counterpart.

use crate::ast::LiteralKind;
use crate::error::EmitError;
use crate::typechecker::{FieldChain, ResolvedExpr};

use super::{LabelEmitter, RECORD_VAR, TargetLanguage, expect_arity};

pub struct TypeScriptEmitter;

impl LabelEmitter for TypeScriptEmitter {
    fn language(&self) -> TargetLanguage {
        TargetLanguage::TypeScript
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

fn access(chain: &FieldChain) -> String {
    let mut path = RECORD_VAR.to_string();

    for (index, segment) in chain.segments.iter().enumerate() {
        // `?.` after a nullable hop, plain `.` otherwise
        let separator = if index > 0 && chain.segments[index - 1].nullable {
            "?."
        } else {
            "."
        };
        path = format!("{path}{separator}{}", segment.field);
    }

    if chain.guarded {
        format!("({path} ?? null)")
    } else {
        path
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
                "({cond} != null && {cond} !== \"\" ? {then} : {otherwise})"
            ))
        }
        "upper" => {
            expect_arity(op, args, 1)?;
            Ok(format!("String({}).toUpperCase()", emit_expr(&args[0])?))
        }
        "lower" => {
            expect_arity(op, args, 1)?;
            Ok(format!("String({}).toLowerCase()", emit_expr(&args[0])?))
        }
        "is_none" => {
            expect_arity(op, args, 3)?;
            let cond = emit_expr(&args[0])?;
            let then = emit_expr(&args[1])?;
            let otherwise = emit_expr(&args[2])?;
            Ok(format!("({cond} == null ? {then} : {otherwise})"))
        }
        "=" => {
            expect_arity(op, args, 4)?;
            let left = emit_expr(&args[0])?;
            let right = emit_expr(&args[1])?;
            let then = emit_expr(&args[2])?;
            let otherwise = emit_expr(&args[3])?;
            Ok(format!("({left} == {right} ? {then} : {otherwise})"))
        }
        "date_str" => {
            // hosts provide a strftime shim on their date values
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
                "({value}).toLocaleString('en-US', {{ minimumFractionDigits: {digits}, maximumFractionDigits: {digits} }})"
            ))
        }
        "int_str" => {
            expect_arity(op, args, 1)?;
            let value = emit_expr(&args[0])?;
            Ok(format!(
                "({value}).toLocaleString('en-US', {{ minimumFractionDigits: 0, maximumFractionDigits: 0 }})"
            ))
        }
        _ => Err(EmitError::UnsupportedOperator {
            operator: op.to_string(),
        }),
    }
}

fn concat_piece(arg: &ResolvedExpr) -> Result<String, EmitError> {
    match arg {
        ResolvedExpr::Literal { value, .. } => Ok(format!("\"{value}\"")),
        _ => {
            let piece = emit_expr(arg)?;
            Ok(format!(
                "({piece} == null || {piece} === \"\" ? \"\" : String({piece}))"
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
        TypeScriptEmitter.emit(&resolved)
    }

    #[test]
    fn concat_wraps_field_operands() {
        insta::assert_snapshot!(
            emit("(concat name)").unwrap(),
            @r#"(record.name == null || record.name === "" ? "" : String(record.name))"#
        );
    }

    #[test]
    fn fallback_label() {
        insta::assert_snapshot!(
            emit(r#"(if name name (concat "ID:" " " id))"#).unwrap(),
            @r#"(record.name != null && record.name !== "" ? record.name : "ID:" + " " + (record.id == null || record.id === "" ? "" : String(record.id)))"#
        );
    }

    #[test]
    fn guarded_chain_uses_optional_chaining() {
        insta::assert_snapshot!(
            emit("(is_none employer.name \"-\" employer.name)").unwrap(),
            @r#"((record.employer?.name ?? null) == null ? "-" : (record.employer?.name ?? null))"#
        );
    }

    #[test]
    fn numeric_formatting() {
        insta::assert_snapshot!(
            emit("(float_str price 2)").unwrap(),
            @"(record.price).toLocaleString('en-US', { minimumFractionDigits: 2, maximumFractionDigits: 2 })"
        );
        insta::assert_snapshot!(
            emit("(int_str id)").unwrap(),
            @"(record.id).toLocaleString('en-US', { minimumFractionDigits: 0, maximumFractionDigits: 0 })"
        );
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
}
