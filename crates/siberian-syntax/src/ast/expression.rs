//! Expression and statement nodes
//!
//! Generated code is built from these nodes. Expressions read from source
//! (initializers, default values, attribute arguments) are only structured
//! when they are simple literals or names; everything else is carried as
//! [`Expr::Verbatim`] text.

use std::fmt;

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `name`
    Identifier(String),

    /// Integer or float literal, as spelled
    NumberLiteral(String),

    /// String literal; holds the contents as written, escapes intact
    StringLiteral(String),

    /// `true` / `false`
    BoolLiteral(bool),

    /// `nil`
    Nil,

    /// `base.name`
    Member { base: Box<Expr>, name: String },

    /// `callee(label: value, ...)`
    Call {
        callee: Box<Expr>,
        arguments: Vec<Argument>,
    },

    /// `base?`, used as `closure?(args)`
    OptionalChain(Box<Expr>),

    /// `&value`
    InOut(Box<Expr>),

    /// `(a: a, b: b)`
    Tuple(Vec<Argument>),

    /// `[a, b]`
    Array(Vec<Expr>),

    /// `lhs op rhs`
    Binary {
        lhs: Box<Expr>,
        op: String,
        rhs: Box<Expr>,
    },

    /// `try expr`
    Try(Box<Expr>),

    /// `await expr`
    Await(Box<Expr>),

    /// Source text kept as written
    Verbatim(String),
}

/// A (possibly labelled) argument or tuple element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub label: Option<String>,
    pub value: Expr,
}

impl Argument {
    pub fn unlabeled(value: Expr) -> Self {
        Self { label: None, value }
    }

    pub fn labeled(label: impl Into<String>, value: Expr) -> Self {
        Self {
            label: Some(label.into()),
            value,
        }
    }
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn member(base: Expr, name: impl Into<String>) -> Self {
        Expr::Member {
            base: Box::new(base),
            name: name.into(),
        }
    }

    pub fn call(callee: Expr, arguments: Vec<Argument>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn binary(lhs: Expr, op: impl Into<String>, rhs: Expr) -> Self {
        Expr::Binary {
            lhs: Box::new(lhs),
            op: op.into(),
            rhs: Box::new(rhs),
        }
    }

    /// Wraps in `try` and/or `await` in the order Swift requires (`try await`).
    pub fn with_effects(self, is_async: bool, is_throwing: bool) -> Self {
        let expr = if is_async {
            Expr::Await(Box::new(self))
        } else {
            self
        };
        if is_throwing {
            Expr::Try(Box::new(expr))
        } else {
            expr
        }
    }

    /// The literal string value, if this is a string literal.
    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            Expr::StringLiteral(value) => Some(value),
            _ => None,
        }
    }
}

fn write_arguments(f: &mut fmt::Formatter<'_>, arguments: &[Argument]) -> fmt::Result {
    for (i, argument) in arguments.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        if let Some(label) = &argument.label {
            write!(f, "{}: ", label)?;
        }
        write!(f, "{}", argument.value)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name) => write!(f, "{}", name),
            Expr::NumberLiteral(text) => write!(f, "{}", text),
            Expr::StringLiteral(value) => write!(f, "\"{}\"", value),
            Expr::BoolLiteral(value) => write!(f, "{}", value),
            Expr::Nil => write!(f, "nil"),
            Expr::Member { base, name } => write!(f, "{}.{}", base, name),
            Expr::Call { callee, arguments } => {
                write!(f, "{}(", callee)?;
                write_arguments(f, arguments)?;
                write!(f, ")")
            }
            Expr::OptionalChain(base) => write!(f, "{}?", base),
            Expr::InOut(value) => write!(f, "&{}", value),
            Expr::Tuple(elements) => {
                write!(f, "(")?;
                write_arguments(f, elements)?;
                write!(f, ")")
            }
            Expr::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Expr::Binary { lhs, op, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            Expr::Try(inner) => write!(f, "try {}", inner),
            Expr::Await(inner) => write!(f, "await {}", inner),
            Expr::Verbatim(text) => write!(f, "{}", text),
        }
    }
}

/// A statement inside a generated body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// Expression statement
    Expr(Expr),

    /// `return` / `return value`
    Return(Option<Expr>),

    /// `target = value`, `target += value`
    Assign {
        target: Expr,
        op: AssignOp,
        value: Expr,
    },

    /// `if let binding = value { ... } else { ... }`
    IfLet {
        binding: String,
        value: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },

    /// Source text kept as written (user-authored bodies)
    Verbatim(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignOp::Assign => write!(f, "="),
            AssignOp::AddAssign => write!(f, "+="),
        }
    }
}

impl Stmt {
    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign {
            target,
            op: AssignOp::Assign,
            value,
        }
    }

    pub fn add_assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign {
            target,
            op: AssignOp::AddAssign,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effects_order_is_try_await() {
        let call = Expr::call(Expr::ident("closure"), vec![]).with_effects(true, true);
        assert_eq!(call.to_string(), "try await closure()");
    }

    #[test]
    fn test_optional_chain_call() {
        let call = Expr::call(
            Expr::OptionalChain(Box::new(Expr::ident("fClosure"))),
            vec![Argument::unlabeled(Expr::InOut(Box::new(Expr::ident("x"))))],
        );
        assert_eq!(call.to_string(), "fClosure?(&x)");
    }

    #[test]
    fn test_labelled_tuple() {
        let tuple = Expr::Tuple(vec![
            Argument::labeled("a", Expr::ident("a")),
            Argument::labeled("b", Expr::ident("b")),
        ]);
        assert_eq!(tuple.to_string(), "(a: a, b: b)");
    }

    #[test]
    fn test_string_literal_reprints_as_written() {
        assert_eq!(Expr::StringLiteral(r#"say \"hi\""#.into()).to_string(), r#""say \"hi\"""#);
    }
}
