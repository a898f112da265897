//! Contains the constant evaluation of stored expressions.

use std::{cmp::Ordering, sync::Arc};

use enum_as_inner::EnumAsInner;
use thiserror::Error;

use super::{
    write_escaped, BinaryOperator, ExpressionData, ExpressionID,
    ExpressionMask, ExpressionType, Literal, UnaryOperator,
};
use crate::{
    database::Database, expression::Expression, unit::Query,
    variable::VariableType, view::View,
};

/// The maximum nesting of operands and name references followed by one
/// evaluation.
pub const MAXIMUM_DEPTH: usize = 256;

/// The error type for evaluating constant expressions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum EvaluationError {
    #[error("expected a value in {expected:?}, found {found:?}")]
    MaskMismatch { expected: ExpressionMask, found: ExpressionType },

    #[error("mismatched operands {lhs:?} and {rhs:?}")]
    MismatchedOperands { lhs: ExpressionType, rhs: ExpressionType },

    #[error("division by zero")]
    DivisionByZero,

    #[error("the result does not fit its type")]
    Overflow,

    #[error("shift amount out of range")]
    InvalidShift,

    #[error("invalid operator")]
    InvalidOperator,

    #[error("`{0}` does not name a constant or an enum field")]
    UndefinedName(String),

    #[error("`{0}` is not a constant")]
    NotConstant(String),

    #[error("the evaluation is nested deeper than {MAXIMUM_DEPTH} levels")]
    TooDeep,

    #[error("the expression refers to a node that no longer exists")]
    InvalidHandle,
}

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq, EnumAsInner)]
#[allow(missing_docs)]
pub enum Value {
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    LLong(i64),
    ULLong(u64),
    Float(f32),
    Double(f64),
    String(Arc<str>),
    Char(char),
    Bool(bool),
    Null,
}

impl Value {
    /// Converts a literal into its value. Names have no value of their own.
    #[must_use]
    pub fn from_literal(literal: &Literal) -> Option<Self> {
        Some(match literal {
            Literal::Int(value) => Self::Int(*value),
            Literal::UInt(value) => Self::UInt(*value),
            Literal::Long(value) => Self::Long(*value),
            Literal::ULong(value) => Self::ULong(*value),
            Literal::LLong(value) => Self::LLong(*value),
            Literal::ULLong(value) => Self::ULLong(*value),
            Literal::Float(value) => Self::Float(*value),
            Literal::Double(value) => Self::Double(*value),
            Literal::String(value) => Self::String(value.clone()),
            Literal::Char(value) => Self::Char(*value),
            Literal::Bool(value) => Self::Bool(*value),
            Literal::Null => Self::Null,
            Literal::Name(_) => return None,
        })
    }

    /// Returns the kind of the value.
    #[must_use]
    pub fn expression_type(&self) -> ExpressionType {
        self.to_literal_tree().expression_type()
    }

    fn to_literal_tree(&self) -> Literal {
        match self {
            Self::Int(value) => Literal::Int(*value),
            Self::UInt(value) => Literal::UInt(*value),
            Self::Long(value) => Literal::Long(*value),
            Self::ULong(value) => Literal::ULong(*value),
            Self::LLong(value) => Literal::LLong(*value),
            Self::ULLong(value) => Literal::ULLong(*value),
            Self::Float(value) => Literal::Float(*value),
            Self::Double(value) => Literal::Double(*value),
            Self::String(value) => Literal::String(value.clone()),
            Self::Char(value) => Literal::Char(*value),
            Self::Bool(value) => Literal::Bool(*value),
            Self::Null => Literal::Null,
        }
    }

    /// Renders the value as a C literal, such as `5U`, `EINA_TRUE` or
    /// `NULL`.
    #[must_use]
    pub fn to_literal(&self) -> String {
        match self {
            Self::Bool(true) => "EINA_TRUE".to_owned(),
            Self::Bool(false) => "EINA_FALSE".to_owned(),
            Self::Null => "NULL".to_owned(),
            Self::Float(value) => format!("{value:?}f"),
            Self::Double(value) => format!("{value:?}"),
            Self::String(value) => CLiteral(value, '"').to_string(),
            Self::Char(value) => {
                let mut buffer = [0; 4];
                CLiteral(value.encode_utf8(&mut buffer), '\'').to_string()
            }
            integer => integer.to_literal_tree().to_string(),
        }
    }

    fn number(&self) -> Option<Number> {
        Some(match self {
            Self::Int(value) => Number::Integer(i128::from(*value)),
            Self::UInt(value) => Number::Integer(i128::from(*value)),
            Self::Long(value) | Self::LLong(value) => {
                Number::Integer(i128::from(*value))
            }
            Self::ULong(value) | Self::ULLong(value) => {
                Number::Integer(i128::from(*value))
            }
            Self::Float(value) => Number::Floating(f64::from(*value)),
            Self::Double(value) => Number::Floating(*value),
            _ => return None,
        })
    }

    fn truthy(&self) -> bool {
        match self.number() {
            Some(Number::Integer(value)) => value != 0,
            Some(Number::Floating(value)) => value != 0.0,
            None => matches!(self, Self::Bool(true)),
        }
    }
}

impl From<Value> for Literal {
    fn from(value: Value) -> Self { value.to_literal_tree() }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.to_literal_tree(), f)
    }
}

struct CLiteral<'a>(&'a str, char);

impl std::fmt::Display for CLiteral<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_escaped(f, self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Integer(i128),
    Floating(f64),
}

impl Number {
    #[allow(clippy::cast_precision_loss)]
    fn floating(self) -> f64 {
        match self {
            Self::Integer(value) => value as f64,
            Self::Floating(value) => value,
        }
    }
}

/// Returns the position of the kind in the usual arithmetic promotion.
fn rank(kind: ExpressionType) -> u8 {
    match kind {
        ExpressionType::Int => 0,
        ExpressionType::UInt => 1,
        ExpressionType::Long => 2,
        ExpressionType::ULong => 3,
        ExpressionType::LLong => 4,
        ExpressionType::ULLong => 5,
        ExpressionType::Float => 6,
        _ => 7,
    }
}

fn promote(lhs: ExpressionType, rhs: ExpressionType) -> ExpressionType {
    if rank(lhs) >= rank(rhs) {
        lhs
    } else {
        rhs
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn make_number(
    kind: ExpressionType,
    number: Number,
) -> Result<Value, EvaluationError> {
    let value = match (kind, number) {
        (ExpressionType::Float, number) => {
            Value::Float(number.floating() as f32)
        }
        (ExpressionType::Double, number) => Value::Double(number.floating()),
        (_, Number::Floating(_)) => return Err(EvaluationError::Overflow),
        (kind, Number::Integer(value)) => {
            let converted = match kind {
                ExpressionType::Int => i32::try_from(value).map(Value::Int),
                ExpressionType::UInt => u32::try_from(value).map(Value::UInt),
                ExpressionType::Long => i64::try_from(value).map(Value::Long),
                ExpressionType::ULong => u64::try_from(value).map(Value::ULong),
                ExpressionType::LLong => i64::try_from(value).map(Value::LLong),
                _ => u64::try_from(value).map(Value::ULLong),
            };

            converted.map_err(|_| EvaluationError::Overflow)?
        }
    };

    Ok(value)
}

/// Walks stored expressions and folds them into [`Value`]s.
pub(super) struct Evaluator<'db> {
    database: &'db Database,
    depth: usize,
}

impl<'db> Evaluator<'db> {
    pub(super) fn new(database: &'db Database) -> Self {
        Self { database, depth: 0 }
    }

    pub(super) fn evaluate(
        &mut self,
        id: ExpressionID,
        mask: ExpressionMask,
    ) -> Result<Value, EvaluationError> {
        if self.depth >= MAXIMUM_DEPTH {
            return Err(EvaluationError::TooDeep);
        }

        self.depth += 1;
        let result = self.evaluate_node(id, mask);
        self.depth -= 1;

        let value = result?;
        let found = value.expression_type();

        if mask.intersects(found.mask()) {
            Ok(value)
        } else {
            Err(EvaluationError::MaskMismatch { expected: mask, found })
        }
    }

    fn evaluate_node(
        &mut self,
        id: ExpressionID,
        mask: ExpressionMask,
    ) -> Result<Value, EvaluationError> {
        let expression: Expression<'db> = View::new(self.database, id)
            .ok_or(EvaluationError::InvalidHandle)?;

        match expression.record() {
            ExpressionData::Literal(Literal::Name(name)) => {
                self.evaluate_name(name, mask)
            }
            ExpressionData::Literal(literal) => {
                Ok(Value::from_literal(literal).unwrap_or(Value::Null))
            }
            ExpressionData::Unary { operator, operand } => {
                self.evaluate_unary(*operator, *operand)
            }
            ExpressionData::Binary { operator, lhs, rhs } => {
                self.evaluate_binary(*operator, *lhs, *rhs)
            }
        }
    }

    fn evaluate_name(
        &mut self,
        name: &str,
        mask: ExpressionMask,
    ) -> Result<Value, EvaluationError> {
        let unit = self.database.unit();

        if let Some(variable) = unit
            .constant_by_name(name)
            .or_else(|| unit.global_by_name(name))
        {
            if variable.variable_type() != VariableType::Constant {
                return Err(EvaluationError::NotConstant(name.to_owned()));
            }

            let value = variable
                .value()
                .ok_or_else(|| EvaluationError::NotConstant(name.to_owned()))?;

            return self.evaluate(value.id(), mask);
        }

        let field = name.rsplit_once('.').and_then(|(enum_name, field)| {
            unit.enum_by_name(enum_name)?.enum_field(field)
        });

        match field.and_then(|field| field.value(true)) {
            Some(value) => self.evaluate(value.id(), mask),
            None => Err(EvaluationError::UndefinedName(name.to_owned())),
        }
    }

    fn evaluate_unary(
        &mut self,
        operator: UnaryOperator,
        operand: ExpressionID,
    ) -> Result<Value, EvaluationError> {
        match operator {
            UnaryOperator::Invalid => Err(EvaluationError::InvalidOperator),
            UnaryOperator::Unp => {
                self.evaluate(operand, ExpressionMask::NUMBER)
            }
            UnaryOperator::Not => {
                let value = self.evaluate(
                    operand,
                    ExpressionMask::NUMBER
                        | ExpressionMask::BOOL
                        | ExpressionMask::NULL,
                )?;

                Ok(Value::Bool(!value.truthy()))
            }
            UnaryOperator::Unm => {
                let value = self.evaluate(operand, ExpressionMask::SIGNED)?;

                match value {
                    Value::Int(value) => value.checked_neg().map(Value::Int),
                    Value::Long(value) => value.checked_neg().map(Value::Long),
                    Value::LLong(value) => {
                        value.checked_neg().map(Value::LLong)
                    }
                    Value::Float(value) => Some(Value::Float(-value)),
                    Value::Double(value) => Some(Value::Double(-value)),
                    _ => None,
                }
                .ok_or(EvaluationError::Overflow)
            }
            UnaryOperator::BNot => {
                let value = self.evaluate(operand, ExpressionMask::INT)?;

                Ok(match value {
                    Value::Int(value) => Value::Int(!value),
                    Value::UInt(value) => Value::UInt(!value),
                    Value::Long(value) => Value::Long(!value),
                    Value::ULong(value) => Value::ULong(!value),
                    Value::LLong(value) => Value::LLong(!value),
                    Value::ULLong(value) => Value::ULLong(!value),
                    other => other,
                })
            }
        }
    }

    fn evaluate_binary(
        &mut self,
        operator: BinaryOperator,
        lhs: ExpressionID,
        rhs: ExpressionID,
    ) -> Result<Value, EvaluationError> {
        match operator {
            BinaryOperator::Invalid => Err(EvaluationError::InvalidOperator),

            BinaryOperator::And | BinaryOperator::Or => {
                let mask = ExpressionMask::NUMBER
                    | ExpressionMask::BOOL
                    | ExpressionMask::NULL;
                let left = self.evaluate(lhs, mask)?.truthy();

                // short-circuits like C
                if left == (operator == BinaryOperator::Or) {
                    return Ok(Value::Bool(left));
                }

                Ok(Value::Bool(self.evaluate(rhs, mask)?.truthy()))
            }

            BinaryOperator::Eq | BinaryOperator::Nq => {
                let left = self.evaluate(lhs, ExpressionMask::ALL)?;
                let right = self.evaluate(rhs, ExpressionMask::ALL)?;
                let equal =
                    Self::compare(&left, &right)? == Some(Ordering::Equal);

                Ok(Value::Bool(equal == (operator == BinaryOperator::Eq)))
            }

            BinaryOperator::Gt
            | BinaryOperator::Lt
            | BinaryOperator::Ge
            | BinaryOperator::Le => {
                let left = self.evaluate(lhs, ExpressionMask::NUMBER)?;
                let right = self.evaluate(rhs, ExpressionMask::NUMBER)?;
                let ordering = Self::compare(&left, &right)?;

                Ok(Value::Bool(ordering.is_some_and(|ordering| match operator {
                    BinaryOperator::Gt => ordering.is_gt(),
                    BinaryOperator::Lt => ordering.is_lt(),
                    BinaryOperator::Ge => ordering.is_ge(),
                    _ => ordering.is_le(),
                })))
            }

            BinaryOperator::Add
            | BinaryOperator::Sub
            | BinaryOperator::Mul
            | BinaryOperator::Div => {
                let left = self.evaluate(lhs, ExpressionMask::NUMBER)?;
                let right = self.evaluate(rhs, ExpressionMask::NUMBER)?;

                Self::arithmetic(operator, &left, &right)
            }

            BinaryOperator::Mod
            | BinaryOperator::BAnd
            | BinaryOperator::BOr
            | BinaryOperator::BXor
            | BinaryOperator::Lsh
            | BinaryOperator::Rsh => {
                let left = self.evaluate(lhs, ExpressionMask::INT)?;
                let right = self.evaluate(rhs, ExpressionMask::INT)?;

                Self::integral(operator, &left, &right)
            }
        }
    }

    /// Compares two values of the same category; numbers are compared after
    /// promotion. `None` when the numbers are unordered.
    fn compare(
        left: &Value,
        right: &Value,
    ) -> Result<Option<Ordering>, EvaluationError> {
        let mismatch = || EvaluationError::MismatchedOperands {
            lhs: left.expression_type(),
            rhs: right.expression_type(),
        };

        if let (Some(a), Some(b)) = (left.number(), right.number()) {
            return Ok(match (a, b) {
                (Number::Integer(a), Number::Integer(b)) => Some(a.cmp(&b)),
                (a, b) => a.floating().partial_cmp(&b.floating()),
            });
        }

        match (left, right) {
            (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
            (Value::Char(a), Value::Char(b)) => Ok(Some(a.cmp(b))),
            (Value::Bool(a), Value::Bool(b)) => Ok(Some(a.cmp(b))),
            (Value::Null, Value::Null) => Ok(Some(Ordering::Equal)),
            _ => Err(mismatch()),
        }
    }

    fn arithmetic(
        operator: BinaryOperator,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvaluationError> {
        let kind = promote(left.expression_type(), right.expression_type());
        let (Some(a), Some(b)) = (left.number(), right.number()) else {
            return Err(EvaluationError::MismatchedOperands {
                lhs: left.expression_type(),
                rhs: right.expression_type(),
            });
        };

        let result = match (a, b) {
            (Number::Integer(a), Number::Integer(b)) => {
                let result = match operator {
                    BinaryOperator::Add => a.checked_add(b),
                    BinaryOperator::Sub => a.checked_sub(b),
                    BinaryOperator::Mul => a.checked_mul(b),
                    _ if b == 0 => return Err(EvaluationError::DivisionByZero),
                    _ => a.checked_div(b),
                };

                Number::Integer(result.ok_or(EvaluationError::Overflow)?)
            }
            (a, b) => {
                let (a, b) = (a.floating(), b.floating());

                Number::Floating(match operator {
                    BinaryOperator::Add => a + b,
                    BinaryOperator::Sub => a - b,
                    BinaryOperator::Mul => a * b,
                    _ => a / b,
                })
            }
        };

        make_number(kind, result)
    }

    fn integral(
        operator: BinaryOperator,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EvaluationError> {
        let (Some(Number::Integer(a)), Some(Number::Integer(b))) =
            (left.number(), right.number())
        else {
            return Err(EvaluationError::MismatchedOperands {
                lhs: left.expression_type(),
                rhs: right.expression_type(),
            });
        };

        if matches!(operator, BinaryOperator::Lsh | BinaryOperator::Rsh) {
            let kind = left.expression_type();
            let bits = match kind {
                ExpressionType::Int | ExpressionType::UInt => 32,
                _ => 64,
            };
            let shift = u32::try_from(b)
                .ok()
                .filter(|shift| *shift < bits)
                .ok_or(EvaluationError::InvalidShift)?;

            let result = if operator == BinaryOperator::Lsh {
                a.checked_shl(shift).ok_or(EvaluationError::Overflow)?
            } else {
                a >> shift
            };

            return make_number(kind, Number::Integer(result));
        }

        let kind = promote(left.expression_type(), right.expression_type());
        let result = match operator {
            BinaryOperator::Mod if b == 0 => {
                return Err(EvaluationError::DivisionByZero)
            }
            BinaryOperator::Mod => a % b,
            BinaryOperator::BAnd => a & b,
            BinaryOperator::BOr => a | b,
            _ => a ^ b,
        };

        make_number(kind, Number::Integer(result))
    }
}
