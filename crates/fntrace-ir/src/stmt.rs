//! Statement IR.

use crate::body::Body;

/// Statement kinds.
///
/// `Opaque`, `If` and `Return` are produced by the lift pass. The
/// remaining kinds are inserted by the instrumenter and only ever appear
/// in its output; feeding them back in is rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// Pass-through statement, preserved verbatim and in order.
    Opaque(syn::Stmt),
    /// Conditional with recognized branch structure.
    If {
        cond: syn::Expr,
        then_body: Body,
        else_body: Option<Body>,
    },
    /// Explicit return with optional value.
    Return(Option<syn::Expr>),
    /// Entry line print.
    TraceEntry,
    /// Monotonic start mark capture.
    MarkStart,
    /// Exit line print followed by the return it guards.
    TracedReturn(Option<syn::Expr>),
    /// Exit line print for the implicit fall-through.
    TraceFallThrough,
    /// Unwind-protected region that logs and rethrows panics.
    Guard(Body),
}

impl Stmt {
    /// Create a conditional without an else branch.
    pub fn if_then(cond: syn::Expr, then_body: Body) -> Self {
        Self::If {
            cond,
            then_body,
            else_body: None,
        }
    }

    /// Create a conditional with an else branch.
    pub fn if_then_else(cond: syn::Expr, then_body: Body, else_body: Body) -> Self {
        Self::If {
            cond,
            then_body,
            else_body: Some(else_body),
        }
    }

    /// Create a return statement.
    pub fn ret(value: Option<syn::Expr>) -> Self {
        Self::Return(value)
    }

    /// Check if this statement is an explicit return.
    pub const fn is_return(&self) -> bool {
        matches!(self, Self::Return(_))
    }

    /// Check if this statement was inserted by the instrumenter.
    pub const fn is_inserted(&self) -> bool {
        matches!(
            self,
            Self::TraceEntry
                | Self::MarkStart
                | Self::TracedReturn(_)
                | Self::TraceFallThrough
                | Self::Guard(_)
        )
    }
}
