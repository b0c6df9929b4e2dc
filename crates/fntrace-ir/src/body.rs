//! Function body IR.

use crate::stmt::Stmt;

/// Ordered statement sequence forming one nesting level of a body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
    /// Statements in source order.
    pub stmts: Vec<Stmt>,
}

impl Body {
    /// Create an empty body.
    pub const fn new() -> Self {
        Self { stmts: Vec::new() }
    }

    /// Create a body from statements.
    pub fn from_stmts(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    /// Append a statement.
    pub fn push(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    /// Get number of statements at this level.
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    /// Check if this level is empty.
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    /// Whether every path through this body ends in an explicit return.
    ///
    /// A trailing `if` without an `else` leaves the fall-through path
    /// open, so it is never terminal.
    pub fn is_terminal(&self) -> bool {
        match self.stmts.last() {
            Some(Stmt::Return(_) | Stmt::TracedReturn(_)) => true,
            Some(Stmt::If {
                then_body,
                else_body: Some(else_body),
                ..
            }) => then_body.is_terminal() && else_body.is_terminal(),
            _ => false,
        }
    }
}

impl From<Vec<Stmt>> for Body {
    fn from(stmts: Vec<Stmt>) -> Self {
        Self::from_stmts(stmts)
    }
}
