//! Contains the constant expressions found in default values, enum fields and
//! constants.
//!
//! An expression exists in two forms: the owned [`Tree`], produced by
//! [`parse`] and usable without a database, and the stored form read through
//! [`Expression`] views. Both serialize to the same canonical text.

use std::sync::Arc;

use bitflags::bitflags;
use derive_more::Display;
use enum_as_inner::EnumAsInner;
use eolian_arena::ID;
use strum_macros::EnumIter;

use crate::view::View;

mod eval;
mod parse;

#[cfg(test)]
mod test;

pub use eval::{EvaluationError, Value, MAXIMUM_DEPTH};
pub use parse::{parse, ParseError};

/// The kind of an expression node or of an evaluated value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    EnumIter,
)]
#[allow(missing_docs)]
pub enum ExpressionType {
    #[default]
    Unknown = 0,
    Int = 1,
    UInt = 2,
    Long = 3,
    ULong = 4,
    LLong = 5,
    ULLong = 6,
    Float = 7,
    Double = 8,
    String = 9,
    Char = 10,
    Null = 11,
    Bool = 12,
    Name = 13,
    Unary = 14,
    Binary = 15,
}

impl ExpressionType {
    /// Returns the category the kind of value belongs to, empty for
    /// non-value kinds.
    #[must_use]
    pub fn mask(self) -> ExpressionMask {
        match self {
            Self::Int | Self::Long | Self::LLong => ExpressionMask::SINT,
            Self::UInt | Self::ULong | Self::ULLong => ExpressionMask::UINT,
            Self::Float | Self::Double => ExpressionMask::FLOAT,
            Self::String => ExpressionMask::STRING,
            Self::Char => ExpressionMask::CHAR,
            Self::Null => ExpressionMask::NULL,
            Self::Bool => ExpressionMask::BOOL,
            Self::Unknown | Self::Name | Self::Unary | Self::Binary => {
                ExpressionMask::empty()
            }
        }
    }
}

bitflags! {
    /// A set of value categories that an evaluation accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExpressionMask: u32 {
        /// Signed integers.
        const SINT = 1 << 0;
        /// Unsigned integers.
        const UINT = 1 << 1;
        /// Any integer.
        const INT = Self::SINT.bits() | Self::UINT.bits();
        /// Floating point numbers.
        const FLOAT = 1 << 2;
        /// Booleans.
        const BOOL = 1 << 3;
        /// Strings.
        const STRING = 1 << 4;
        /// Characters.
        const CHAR = 1 << 5;
        /// The null value.
        const NULL = 1 << 6;
        /// Numbers that may be negative.
        const SIGNED = Self::SINT.bits() | Self::FLOAT.bits();
        /// Any number.
        const NUMBER = Self::INT.bits() | Self::FLOAT.bits();
        /// Every category.
        const ALL = Self::NUMBER.bits()
            | Self::BOOL.bits()
            | Self::STRING.bits()
            | Self::CHAR.bits()
            | Self::NULL.bits();
    }
}

/// A binary operator.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Display,
    EnumIter,
)]
#[allow(missing_docs)]
pub enum BinaryOperator {
    #[default]
    #[display(fmt = "?")]
    Invalid = 0,
    #[display(fmt = "+")]
    Add = 1,
    #[display(fmt = "-")]
    Sub = 2,
    #[display(fmt = "*")]
    Mul = 3,
    #[display(fmt = "/")]
    Div = 4,
    #[display(fmt = "%")]
    Mod = 5,
    #[display(fmt = "==")]
    Eq = 6,
    #[display(fmt = "!=")]
    Nq = 7,
    #[display(fmt = ">")]
    Gt = 8,
    #[display(fmt = "<")]
    Lt = 9,
    #[display(fmt = ">=")]
    Ge = 10,
    #[display(fmt = "<=")]
    Le = 11,
    #[display(fmt = "&&")]
    And = 12,
    #[display(fmt = "||")]
    Or = 13,
    #[display(fmt = "&")]
    BAnd = 14,
    #[display(fmt = "|")]
    BOr = 15,
    #[display(fmt = "^")]
    BXor = 16,
    #[display(fmt = "<<")]
    Lsh = 17,
    #[display(fmt = ">>")]
    Rsh = 18,
}

impl BinaryOperator {
    /// Returns the left and right binding power used while parsing; a higher
    /// power binds tighter. `None` for [`BinaryOperator::Invalid`].
    #[must_use]
    pub fn binding_power(self) -> Option<(u8, u8)> {
        let left = match self {
            Self::Invalid => return None,
            Self::Or => 1,
            Self::And => 3,
            Self::BOr => 5,
            Self::BXor => 7,
            Self::BAnd => 9,
            Self::Eq | Self::Nq => 11,
            Self::Gt | Self::Lt | Self::Ge | Self::Le => 13,
            Self::Lsh | Self::Rsh => 15,
            Self::Add | Self::Sub => 17,
            Self::Mul | Self::Div | Self::Mod => 19,
        };

        Some((left, left + 1))
    }
}

/// A unary operator.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Display,
    EnumIter,
)]
#[allow(missing_docs)]
pub enum UnaryOperator {
    #[default]
    #[display(fmt = "?")]
    Invalid = 0,
    #[display(fmt = "-")]
    Unm = 1,
    #[display(fmt = "+")]
    Unp = 2,
    #[display(fmt = "!")]
    Not = 3,
    #[display(fmt = "~")]
    BNot = 4,
}

/// A leaf of an expression.
#[derive(Debug, Clone, PartialEq, EnumAsInner)]
#[allow(missing_docs)]
pub enum Literal {
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
    /// A reference to a constant or an enum field, such as `Foo.Bar`.
    Name(Arc<str>),
}

impl Literal {
    /// Returns the kind of the literal.
    #[must_use]
    pub fn expression_type(&self) -> ExpressionType {
        match self {
            Self::Int(_) => ExpressionType::Int,
            Self::UInt(_) => ExpressionType::UInt,
            Self::Long(_) => ExpressionType::Long,
            Self::ULong(_) => ExpressionType::ULong,
            Self::LLong(_) => ExpressionType::LLong,
            Self::ULLong(_) => ExpressionType::ULLong,
            Self::Float(_) => ExpressionType::Float,
            Self::Double(_) => ExpressionType::Double,
            Self::String(_) => ExpressionType::String,
            Self::Char(_) => ExpressionType::Char,
            Self::Bool(_) => ExpressionType::Bool,
            Self::Null => ExpressionType::Null,
            Self::Name(_) => ExpressionType::Name,
        }
    }
}

pub(crate) fn write_escaped(
    f: &mut std::fmt::Formatter<'_>,
    text: &str,
    quote: char,
) -> std::fmt::Result {
    use std::fmt::Write;

    f.write_char(quote)?;
    for character in text.chars() {
        match character {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\0' => f.write_str("\\0")?,
            character if character == quote => {
                f.write_char('\\')?;
                f.write_char(character)?;
            }
            character => f.write_char(character)?,
        }
    }
    f.write_char(quote)
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::UInt(value) => write!(f, "{value}U"),
            Self::Long(value) => write!(f, "{value}L"),
            Self::ULong(value) => write!(f, "{value}UL"),
            Self::LLong(value) => write!(f, "{value}LL"),
            Self::ULLong(value) => write!(f, "{value}ULL"),
            Self::Float(value) => write!(f, "{value:?}f"),
            Self::Double(value) => write!(f, "{value:?}"),
            Self::String(value) => write_escaped(f, value, '"'),
            Self::Char(value) => {
                let mut buffer = [0; 4];
                write_escaped(f, value.encode_utf8(&mut buffer), '\'')
            }
            Self::Bool(value) => write!(f, "{value}"),
            Self::Null => f.write_str("null"),
            Self::Name(value) => f.write_str(value),
        }
    }
}

/// An owned expression tree.
///
/// The [`Display`](std::fmt::Display) implementation produces the canonical
/// text, which [`parse`] reads back into an equal tree.
#[derive(Debug, Clone, PartialEq, EnumAsInner)]
#[allow(missing_docs)]
pub enum Tree {
    Literal(Literal),
    Unary { operator: UnaryOperator, operand: Box<Tree> },
    Binary { operator: BinaryOperator, lhs: Box<Tree>, rhs: Box<Tree> },
}

impl Tree {
    /// Creates a unary node.
    #[must_use]
    pub fn unary(operator: UnaryOperator, operand: Self) -> Self {
        Self::Unary { operator, operand: Box::new(operand) }
    }

    /// Creates a binary node.
    #[must_use]
    pub fn binary(operator: BinaryOperator, lhs: Self, rhs: Self) -> Self {
        Self::Binary { operator, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    /// Returns the kind of the root node.
    #[must_use]
    pub fn expression_type(&self) -> ExpressionType {
        match self {
            Self::Literal(literal) => literal.expression_type(),
            Self::Unary { .. } => ExpressionType::Unary,
            Self::Binary { .. } => ExpressionType::Binary,
        }
    }

    /// Serializes the tree into its canonical text.
    #[must_use]
    pub fn serialize(&self) -> String { self.to_string() }
}

impl From<Literal> for Tree {
    fn from(value: Literal) -> Self { Self::Literal(value) }
}

/// Writes an operand, parenthesizing it when it is compound or when its text
/// would otherwise glue onto a preceding sign.
fn write_operand(
    f: &mut std::fmt::Formatter<'_>,
    operand: &Tree,
) -> std::fmt::Result {
    let text = operand.to_string();

    if matches!(operand, Tree::Unary { .. } | Tree::Binary { .. })
        || text.starts_with(['-', '+'])
    {
        write!(f, "({text})")
    } else {
        f.write_str(&text)
    }
}

impl std::fmt::Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(literal) => std::fmt::Display::fmt(literal, f),
            Self::Unary { operator, operand } => {
                write!(f, "{operator}")?;
                write_operand(f, operand)
            }
            Self::Binary { operator, lhs, rhs } => {
                write_operand(f, lhs)?;
                write!(f, " {operator} ")?;
                write_operand(f, rhs)
            }
        }
    }
}

/// The record backing an [`Expression`] view.
#[derive(Debug, Clone, PartialEq, EnumAsInner)]
#[allow(missing_docs)]
pub enum ExpressionData {
    Literal(Literal),
    Unary { operator: UnaryOperator, operand: ExpressionID },
    Binary { operator: BinaryOperator, lhs: ExpressionID, rhs: ExpressionID },
}

/// The handle of a stored expression node.
pub type ExpressionID = ID<ExpressionData>;

/// A stored expression node.
pub type Expression<'db> = View<'db, ExpressionData>;

impl<'db> View<'db, ExpressionData> {
    /// Returns the kind of the node.
    #[must_use]
    pub fn expression_type(&self) -> ExpressionType {
        match self.record() {
            ExpressionData::Literal(literal) => literal.expression_type(),
            ExpressionData::Unary { .. } => ExpressionType::Unary,
            ExpressionData::Binary { .. } => ExpressionType::Binary,
        }
    }

    /// Returns the literal of a leaf node.
    #[must_use]
    pub fn literal(&self) -> Option<&'db Literal> {
        self.record().as_literal()
    }

    /// Returns the value of a literal node without evaluating anything.
    ///
    /// Returns `None` for names and compound nodes.
    #[must_use]
    pub fn value(&self) -> Option<Value> {
        self.literal().and_then(Value::from_literal)
    }

    /// Returns the operator of a binary node,
    /// [`BinaryOperator::Invalid`] otherwise.
    #[must_use]
    pub fn binary_operator(&self) -> BinaryOperator {
        match self.record() {
            ExpressionData::Binary { operator, .. } => *operator,
            _ => BinaryOperator::Invalid,
        }
    }

    /// Returns the left operand of a binary node.
    #[must_use]
    pub fn binary_lhs(&self) -> Option<Self> {
        match self.record() {
            ExpressionData::Binary { lhs, .. } => self.resolve(*lhs),
            _ => None,
        }
    }

    /// Returns the right operand of a binary node.
    #[must_use]
    pub fn binary_rhs(&self) -> Option<Self> {
        match self.record() {
            ExpressionData::Binary { rhs, .. } => self.resolve(*rhs),
            _ => None,
        }
    }

    /// Returns the operator of a unary node, [`UnaryOperator::Invalid`]
    /// otherwise.
    #[must_use]
    pub fn unary_operator(&self) -> UnaryOperator {
        match self.record() {
            ExpressionData::Unary { operator, .. } => *operator,
            _ => UnaryOperator::Invalid,
        }
    }

    /// Returns the operand of a unary node.
    #[must_use]
    pub fn unary_operand(&self) -> Option<Self> {
        match self.record() {
            ExpressionData::Unary { operand, .. } => self.resolve(*operand),
            _ => None,
        }
    }

    /// Copies the stored node and its operands into an owned [`Tree`].
    ///
    /// Returns `None` if an operand no longer resolves.
    #[must_use]
    pub fn to_tree(&self) -> Option<Tree> {
        Some(match self.record() {
            ExpressionData::Literal(literal) => Tree::Literal(literal.clone()),
            ExpressionData::Unary { operator, operand } => {
                Tree::unary(*operator, self.resolve(*operand)?.to_tree()?)
            }
            ExpressionData::Binary { operator, lhs, rhs } => Tree::binary(
                *operator,
                self.resolve(*lhs)?.to_tree()?,
                self.resolve(*rhs)?.to_tree()?,
            ),
        })
    }

    /// Serializes the expression into its canonical text.
    #[must_use]
    pub fn serialize(&self) -> Option<String> {
        self.to_tree().map(|tree| tree.serialize())
    }

    /// Evaluates the expression, accepting only results whose category is
    /// in `mask`.
    ///
    /// Names are resolved against the constants and enum fields of the
    /// database.
    ///
    /// # Errors
    ///
    /// See [`EvaluationError`] for the ways an evaluation can fail.
    pub fn evaluate(
        &self,
        mask: ExpressionMask,
    ) -> Result<Value, EvaluationError> {
        eval::Evaluator::new(self.database()).evaluate(self.id(), mask)
    }
}
