// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Reference interpreter for resolved labels over JSON records.
//!
//! This is the semantic yardstick the backends are measured against: for a
//! given record, an emitted Python or TypeScript snippet must display what
//! [`evaluate`] computes. Hosts can also use it directly to render labels
//! without any code generation.
//!
//! Booleans stringify as `true`/`false` here, matching the TypeScript
//! backend; Python's `str` spells them `True`/`False`, which is why boolean
//! stringification sits outside the cross-backend parity contract.

use serde_json::Value;

use crate::ast::LiteralKind;
use crate::emitter::expect_arity;
use crate::error::EmitError;
use crate::typechecker::ResolvedExpr;

/// Evaluate a resolved label against `record`. Field chains read nested JSON
/// objects; a missing or null hop yields `Null` rather than an error.
pub fn evaluate(expr: &ResolvedExpr, record: &Value) -> Result<Value, EmitError> {
    match expr {
        ResolvedExpr::Literal { value, kind } => Ok(match kind {
            LiteralKind::Str => Value::String(value.clone()),
            LiteralKind::Int => value
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::Null),
            LiteralKind::Float => value
                .parse::<f64>()
                .map(Value::from)
                .unwrap_or(Value::Null),
        }),
        ResolvedExpr::FieldRef(chain) => {
            let mut current = record;
            for segment in &chain.segments {
                match current.get(&segment.field) {
                    Some(value) if !value.is_null() => current = value,
                    _ => return Ok(Value::Null),
                }
            }
            Ok(current.clone())
        }
        ResolvedExpr::Call { op, args } => call(op, args, record),
    }
}

fn call(op: &str, args: &[ResolvedExpr], record: &Value) -> Result<Value, EmitError> {
    match op {
        "concat" => {
            let mut out = String::new();
            for arg in args {
                match arg {
                    ResolvedExpr::Literal { value, .. } => out.push_str(value),
                    _ => out.push_str(&stringify(&evaluate(arg, record)?)),
                }
            }
            Ok(Value::String(out))
        }
        "if" => {
            expect_arity(op, args, 3)?;
            let cond = evaluate(&args[0], record)?;
            evaluate(if truthy(&cond) { &args[1] } else { &args[2] }, record)
        }
        "upper" => {
            expect_arity(op, args, 1)?;
            Ok(Value::String(
                stringify(&evaluate(&args[0], record)?).to_uppercase(),
            ))
        }
        "lower" => {
            expect_arity(op, args, 1)?;
            Ok(Value::String(
                stringify(&evaluate(&args[0], record)?).to_lowercase(),
            ))
        }
        "is_none" => {
            expect_arity(op, args, 3)?;
            let cond = evaluate(&args[0], record)?;
            evaluate(if cond.is_null() { &args[1] } else { &args[2] }, record)
        }
        "=" => {
            expect_arity(op, args, 4)?;
            let left = evaluate(&args[0], record)?;
            let right = evaluate(&args[1], record)?;
            evaluate(if left == right { &args[2] } else { &args[3] }, record)
        }
        "date_str" => {
            // JSON records carry dates as preformatted strings; the format
            // argument only matters to the generated code.
            expect_arity(op, args, 2)?;
            Ok(Value::String(stringify(&evaluate(&args[0], record)?)))
        }
        "float_str" => {
            expect_arity(op, args, 2)?;
            let value = evaluate(&args[0], record)?;
            let digits = evaluate(&args[1], record)?.as_u64().unwrap_or(0) as usize;
            Ok(match value.as_f64() {
                Some(number) => Value::String(format!("{number:.digits$}")),
                None => Value::String(stringify(&value)),
            })
        }
        "int_str" => {
            expect_arity(op, args, 1)?;
            let value = evaluate(&args[0], record)?;
            Ok(match value.as_i64() {
                Some(number) => Value::String(group_thousands(number)),
                None => Value::String(stringify(&value)),
            })
        }
        _ => Err(EmitError::UnsupportedOperator {
            operator: op.to_string(),
        }),
    }
}

/// Only null and the empty string are falsy; `0` and `false` are truthy.
fn truthy(value: &Value) -> bool {
    !matches!(value, Value::Null) && value.as_str() != Some("")
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn group_thousands(number: i64) -> String {
    let digits = number.unsigned_abs().to_string();
    let mut out = String::new();
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if number < 0 { format!("-{out}") } else { out }
}
