// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The label-expression AST: a closed set of variants dispatched by
//! exhaustive matching in the resolver and the emitters.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Str,
    Int,
    Float,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum LabelExpr {
    /// `"text"`, `42`, or `1.5`. The raw text is kept as written.
    Literal { value: String, kind: LiteralKind },
    /// A bare symbol: a dotted field-reference path such as `customer.name`.
    FieldRef { path: Vec<String> },
    /// `(op arg …)`. `if` and `concat` have fixed semantics; any other
    /// operator is carried through and lowered (or rejected) per backend.
    Call { op: String, args: Vec<LabelExpr> },
}

impl LabelExpr {
    pub fn string_literal(value: impl Into<String>) -> Self {
        LabelExpr::Literal {
            value: value.into(),
            kind: LiteralKind::Str,
        }
    }

    /// Every field-reference path mentioned anywhere in the expression,
    /// deduplicated and ordered. Drives relationship-path computation.
    pub fn referenced_paths(&self) -> BTreeSet<Vec<String>> {
        let mut paths = BTreeSet::new();
        self.collect_paths(&mut paths);
        paths
    }

    fn collect_paths(&self, paths: &mut BTreeSet<Vec<String>>) {
        match self {
            LabelExpr::Literal { .. } => {}
            LabelExpr::FieldRef { path } => {
                paths.insert(path.clone());
            }
            LabelExpr::Call { args, .. } => {
                for arg in args {
                    arg.collect_paths(paths);
                }
            }
        }
    }
}

/// Pretty-printer: the output re-parses to an equal AST.
impl Display for LabelExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelExpr::Literal { value, kind } => match kind {
                LiteralKind::Str => write!(f, "\"{value}\""),
                LiteralKind::Int | LiteralKind::Float => f.write_str(value),
            },
            LabelExpr::FieldRef { path } => f.write_str(&path.join(".")),
            LabelExpr::Call { op, args } => {
                write!(f, "({op}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referenced_paths_deduplicates_across_nesting() {
        let expr = LabelExpr::Call {
            op: "if".into(),
            args: vec![
                LabelExpr::FieldRef {
                    path: vec!["name".into()],
                },
                LabelExpr::FieldRef {
                    path: vec!["name".into()],
                },
                LabelExpr::Call {
                    op: "concat".into(),
                    args: vec![
                        LabelExpr::string_literal("ID:"),
                        LabelExpr::FieldRef {
                            path: vec!["customer".into(), "id".into()],
                        },
                    ],
                },
            ],
        };

        let paths = expr.referenced_paths();
        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&vec!["name".to_string()]));
        assert!(paths.contains(&vec!["customer".to_string(), "id".to_string()]));
    }

    #[test]
    fn pretty_printed_form_is_canonical() {
        let expr = LabelExpr::Call {
            op: "concat".into(),
            args: vec![
                LabelExpr::FieldRef {
                    path: vec!["first_name".into()],
                },
                LabelExpr::string_literal(" "),
                LabelExpr::FieldRef {
                    path: vec!["last_name".into()],
                },
            ],
        };
        assert_eq!(expr.to_string(), r#"(concat first_name " " last_name)"#);
    }
}
