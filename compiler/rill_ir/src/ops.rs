//! Operator enums and their method selectors.
//!
//! Apart from the short-circuiting `&&`/`||`, every operator application is
//! sugar for a method call dispatched on the left operand, so each operator
//! maps to the selector the runtime looks up.

use std::fmt;

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// Short-circuiting `&&`; never dispatched.
    And,
    /// Short-circuiting `||`; never dispatched.
    Or,
}

impl BinaryOp {
    /// The method selector this operator dispatches to, or `None` for the
    /// short-circuiting operators the driver evaluates directly.
    pub fn method_name(self) -> Option<&'static str> {
        match self {
            BinaryOp::Add => Some("+"),
            BinaryOp::Sub => Some("-"),
            BinaryOp::Mul => Some("*"),
            BinaryOp::Div => Some("/"),
            BinaryOp::Rem => Some("%"),
            BinaryOp::Eq => Some("=="),
            BinaryOp::NotEq => Some("!="),
            BinaryOp::Lt => Some("<"),
            BinaryOp::LtEq => Some("<="),
            BinaryOp::Gt => Some(">"),
            BinaryOp::GtEq => Some(">="),
            BinaryOp::And | BinaryOp::Or => None,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            other => other.method_name().unwrap_or("?"),
        };
        write!(f, "{text}")
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Logical negation `!x`.
    Not,
    /// Arithmetic negation `-x`.
    Neg,
}

impl UnaryOp {
    /// The method selector this operator dispatches to. Unary minus uses the
    /// `-@` selector to stay distinct from binary `-`.
    pub fn method_name(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-@",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
        };
        write!(f, "{text}")
    }
}
