//! Escape scan.
//!
//! Before a statement or expression is accepted as opaque, it is scanned
//! for control flow that would leave the enclosing function without
//! passing a trace point: `return` in an unrecognized position or the `?`
//! operator. Closures, `async` blocks and nested item definitions own
//! their `return`s and are not descended into.

use proc_macro2::{TokenStream, TokenTree};
use syn::visit::Visit;

use crate::error::LiftError;

/// Check a statement kept opaque by the lift pass.
pub(crate) fn ensure_opaque_stmt(stmt: &syn::Stmt) -> Result<(), LiftError> {
    let mut scan = EscapeScan::default();
    scan.visit_stmt(stmt);
    scan.into_result()
}

/// Check an expression embedded in a recognized statement (an `if`
/// condition or a `return` value).
pub(crate) fn ensure_opaque_expr(expr: &syn::Expr) -> Result<(), LiftError> {
    let mut scan = EscapeScan::default();
    scan.visit_expr(expr);
    scan.into_result()
}

#[derive(Default)]
struct EscapeScan {
    found: Option<LiftError>,
}

impl EscapeScan {
    fn into_result(self) -> Result<(), LiftError> {
        match self.found {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Token-level scan of macro invocation arguments. Tokens are opaque
    /// to the visitor, so this is conservative: a `return` identifier or
    /// `?` punct anywhere in the tree is rejected even when it belongs to
    /// a closure written inline in the arguments. Literals are single
    /// tokens and cannot false-positive.
    fn scan_tokens(&mut self, tokens: TokenStream) {
        for tree in tokens {
            if self.found.is_some() {
                return;
            }
            match tree {
                TokenTree::Ident(ident) if ident == "return" => {
                    self.found = Some(LiftError::StrayReturn(ident.span()));
                }
                TokenTree::Punct(punct) if punct.as_char() == '?' => {
                    self.found = Some(LiftError::TryOperator(punct.span()));
                }
                TokenTree::Group(group) => self.scan_tokens(group.stream()),
                _ => {}
            }
        }
    }
}

impl<'ast> Visit<'ast> for EscapeScan {
    fn visit_expr_return(&mut self, node: &'ast syn::ExprReturn) {
        if self.found.is_none() {
            self.found = Some(LiftError::StrayReturn(node.return_token.span));
        }
    }

    fn visit_expr_try(&mut self, node: &'ast syn::ExprTry) {
        if self.found.is_none() {
            self.found = Some(LiftError::TryOperator(node.question_token.spans[0]));
        }
    }

    fn visit_expr_closure(&mut self, _node: &'ast syn::ExprClosure) {
        // Inner scope; its returns are not outer exits.
    }

    fn visit_expr_async(&mut self, _node: &'ast syn::ExprAsync) {
        // Inner scope.
    }

    fn visit_item(&mut self, _node: &'ast syn::Item) {
        // Nested definitions own their control flow.
    }

    fn visit_macro(&mut self, node: &'ast syn::Macro) {
        if self.found.is_none() {
            self.scan_tokens(node.tokens.clone());
        }
    }
}
