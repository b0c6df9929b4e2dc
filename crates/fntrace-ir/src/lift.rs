//! Function lifting (`syn` → IR).
//!
//! Lowers a `syn::ItemFn` into the statement IR. Statement `if`/`else`
//! chains and explicit returns are recognized; a value-returning
//! function's trailing tail expression is an exit and lifts to an
//! explicit return, descending through trailing `if` chains so each
//! branch tail becomes its own exit. Everything else passes through
//! opaquely once the escape scan accepts it.

use syn::spanned::Spanned;
use tracing::trace;

use crate::body::Body;
use crate::error::LiftError;
use crate::scan;
use crate::sig::{FnSig, Param, ReturnKind};
use crate::stmt::Stmt;

/// Lift a function item to a signature and body.
pub fn lift_fn(func: &syn::ItemFn) -> Result<(FnSig, Body), LiftError> {
    let sig = lift_sig(&func.sig)?;
    let body = lift_stmts(&func.block.stmts, sig.ret, true)?;
    trace!(function = %sig.name, stmts = body.len(), "lifted function body");
    Ok((sig, body))
}

/// Lift a signature, rejecting shapes the instrumenter cannot trace.
pub fn lift_sig(sig: &syn::Signature) -> Result<FnSig, LiftError> {
    if let Some(token) = sig.asyncness {
        return Err(LiftError::AsyncFn(token.span));
    }
    if let Some(token) = sig.constness {
        return Err(LiftError::ConstFn(token.span));
    }

    let ret = match &sig.output {
        syn::ReturnType::Default => ReturnKind::Void,
        syn::ReturnType::Type(_, ty) => lift_return_type(ty)?,
    };

    let mut params = Vec::new();
    for input in &sig.inputs {
        match input {
            // Receivers are captured by the body, not logged.
            syn::FnArg::Receiver(_) => {}
            syn::FnArg::Typed(arg) => match &*arg.pat {
                syn::Pat::Ident(pat) if pat.subpat.is_none() => {
                    params.push(Param::new(pat.ident.clone()));
                }
                other => return Err(LiftError::UnnamedParam(other.span())),
            },
        }
    }

    Ok(FnSig::new(sig.ident.clone(), params, ret))
}

fn lift_return_type(ty: &syn::Type) -> Result<ReturnKind, LiftError> {
    match ty {
        syn::Type::Never(never) => Err(LiftError::NeverReturn(never.span())),
        syn::Type::Tuple(tuple) if tuple.elems.is_empty() => Ok(ReturnKind::Void),
        syn::Type::Paren(paren) => lift_return_type(&paren.elem),
        _ => Ok(ReturnKind::Value),
    }
}

/// Lift a statement sequence. `fn_tail` is true only for sequences whose
/// final expression is in the function's tail position.
fn lift_stmts(stmts: &[syn::Stmt], ret: ReturnKind, fn_tail: bool) -> Result<Body, LiftError> {
    let mut body = Body::new();
    for (index, stmt) in stmts.iter().enumerate() {
        let at_tail = fn_tail && index + 1 == stmts.len();
        body.push(lift_stmt(stmt, ret, at_tail)?);
    }
    Ok(body)
}

fn lift_stmt(stmt: &syn::Stmt, ret: ReturnKind, at_tail: bool) -> Result<Stmt, LiftError> {
    match stmt {
        syn::Stmt::Expr(expr, semi) => {
            if at_tail && semi.is_none() && !ret.is_void() {
                return lift_tail_expr(expr, ret);
            }
            lift_expr_stmt(stmt, expr, ret)
        }
        other => {
            scan::ensure_opaque_stmt(other)?;
            Ok(Stmt::Opaque(other.clone()))
        }
    }
}

fn lift_expr_stmt(stmt: &syn::Stmt, expr: &syn::Expr, ret: ReturnKind) -> Result<Stmt, LiftError> {
    match expr {
        syn::Expr::Return(ret_expr) => lift_return(ret_expr),
        syn::Expr::If(if_expr) => lift_if(if_expr, ret, false),
        _ => {
            scan::ensure_opaque_stmt(stmt)?;
            Ok(Stmt::Opaque(stmt.clone()))
        }
    }
}

fn lift_return(ret_expr: &syn::ExprReturn) -> Result<Stmt, LiftError> {
    let value = match &ret_expr.expr {
        Some(value) => {
            scan::ensure_opaque_expr(value)?;
            Some((**value).clone())
        }
        None => None,
    };
    Ok(Stmt::Return(value))
}

/// Lift the function's tail expression. A trailing `if`/`else` chain
/// descends so each branch tail becomes its own exit; any other
/// expression is the returned value.
fn lift_tail_expr(expr: &syn::Expr, ret: ReturnKind) -> Result<Stmt, LiftError> {
    match expr {
        syn::Expr::If(if_expr) if if_expr.else_branch.is_some() => lift_if(if_expr, ret, true),
        syn::Expr::Return(ret_expr) => lift_return(ret_expr),
        _ => {
            scan::ensure_opaque_expr(expr)?;
            Ok(Stmt::Return(Some(expr.clone())))
        }
    }
}

fn lift_if(if_expr: &syn::ExprIf, ret: ReturnKind, at_tail: bool) -> Result<Stmt, LiftError> {
    scan::ensure_opaque_expr(&if_expr.cond)?;
    let then_body = lift_stmts(&if_expr.then_branch.stmts, ret, at_tail)?;
    let else_body = match &if_expr.else_branch {
        None => None,
        Some((_, else_expr)) => Some(match &**else_expr {
            syn::Expr::If(nested) => Body::from_stmts(vec![lift_if(nested, ret, at_tail)?]),
            syn::Expr::Block(block) => lift_stmts(&block.block.stmts, ret, at_tail)?,
            other => return Err(LiftError::MalformedElse(other.span())),
        }),
    };
    Ok(Stmt::If {
        cond: (*if_expr.cond).clone(),
        then_body,
        else_body,
    })
}
