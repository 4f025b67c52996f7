//! Query conditions.
//!
//! Conditions name fields by qualified name (`Field` or `Type|Field`). They
//! serve both as WHERE filters and as join ON-conditions; the reference
//! graph stores every inferred join as an `Eq` between two fields.

use std::fmt;

use super::Value;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        }
    }
}

/// A filter or join condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    In {
        field: String,
        values: Vec<Value>,
    },
    Like {
        field: String,
        pattern: String,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Condition::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn neq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Neq, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Condition::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Condition::Like {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition::And(conditions)
    }

    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition::Or(conditions)
    }

    /// Combine with another condition using AND, flattening nested ANDs.
    pub fn and_also(self, other: Condition) -> Self {
        match (self, other) {
            (Condition::And(mut a), Condition::And(b)) => {
                a.extend(b);
                Condition::And(a)
            }
            (Condition::And(mut a), other) => {
                a.push(other);
                Condition::And(a)
            }
            (this, other) => Condition::And(vec![this, other]),
        }
    }

    /// The field this condition tests, if it tests exactly one.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Condition::Compare { field, .. }
            | Condition::In { field, .. }
            | Condition::Like { field, .. } => Some(field),
            Condition::And(_) | Condition::Or(_) => None,
        }
    }

    /// Nested conditions of a compound condition.
    pub fn sub_conditions(&self) -> &[Condition] {
        match self {
            Condition::And(subs) | Condition::Or(subs) => subs,
            _ => &[],
        }
    }

    /// Field and value of an equality comparison.
    pub fn as_eq(&self) -> Option<(&str, &Value)> {
        match self {
            Condition::Compare {
                field,
                op: CompareOp::Eq,
                value,
            } => Some((field, value)),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Compare { field, op, value } => {
                write!(f, "{} {} {}", field, op.as_sql(), value)
            }
            Condition::In { field, values } => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{} IN ({})", field, parts.join(", "))
            }
            Condition::Like { field, pattern } => write!(f, "{} LIKE {:?}", field, pattern),
            Condition::And(subs) => write_compound(f, subs, " AND "),
            Condition::Or(subs) => write_compound(f, subs, " OR "),
        }
    }
}

fn write_compound(f: &mut fmt::Formatter<'_>, subs: &[Condition], sep: &str) -> fmt::Result {
    let parts: Vec<String> = subs.iter().map(|c| c.to_string()).collect();
    write!(f, "({})", parts.join(sep))
}
