//! The function-body rewrite.

use fntrace_ir::{Body, FnSig, Stmt};
use thiserror::Error;
use tracing::debug;

use crate::exits::find_exits;

/// Instrumentation errors.
///
/// Either of these means the function must fail to compile; partially
/// instrumented output would yield misleading traces.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InstrumentError {
    #[error("exit rewrite mismatch: discovered {discovered} explicit exits, rewrote {rewritten}")]
    ExitMismatch { discovered: usize, rewritten: usize },
    #[error("body already contains instrumentation statements")]
    AlreadyInstrumented,
}

/// Rewrite `body` with entry/exit tracing.
///
/// With `enabled == false` this is the identity transform. Otherwise the
/// result is `[TraceEntry, MarkStart, Guard(..)]` where the guarded body
/// is the original statement sequence with every explicit return replaced
/// by a traced return, plus a trailing fall-through print when the
/// implicit exit is reachable. The input tree is consumed; the caller's
/// `syn` AST is never mutated.
pub fn instrument(sig: &FnSig, body: Body, enabled: bool) -> Result<Body, InstrumentError> {
    if !enabled {
        return Ok(body);
    }
    ensure_pristine(&body)?;

    let exits = find_exits(&body, sig.ret);
    let implicit = exits.iter().any(|exit| !exit.explicit);
    let discovered = exits.len() - usize::from(implicit);

    let mut rewritten = 0;
    let mut traced = rewrite_body(body, &mut rewritten);
    if rewritten != discovered {
        return Err(InstrumentError::ExitMismatch {
            discovered,
            rewritten,
        });
    }
    if implicit {
        traced.push(Stmt::TraceFallThrough);
    }

    debug!(
        function = %sig.name,
        exits = rewritten + usize::from(implicit),
        "instrumented function"
    );
    Ok(Body::from_stmts(vec![
        Stmt::TraceEntry,
        Stmt::MarkStart,
        Stmt::Guard(traced),
    ]))
}

fn ensure_pristine(body: &Body) -> Result<(), InstrumentError> {
    for stmt in &body.stmts {
        if stmt.is_inserted() {
            return Err(InstrumentError::AlreadyInstrumented);
        }
        if let Stmt::If {
            then_body,
            else_body,
            ..
        } = stmt
        {
            ensure_pristine(then_body)?;
            if let Some(else_body) = else_body {
                ensure_pristine(else_body)?;
            }
        }
    }
    Ok(())
}

fn rewrite_body(body: Body, rewritten: &mut usize) -> Body {
    let stmts = body
        .stmts
        .into_iter()
        .map(|stmt| match stmt {
            Stmt::Return(value) => {
                *rewritten += 1;
                Stmt::TracedReturn(value)
            }
            Stmt::If {
                cond,
                then_body,
                else_body,
            } => Stmt::If {
                cond,
                then_body: rewrite_body(then_body, rewritten),
                else_body: else_body.map(|body| rewrite_body(body, rewritten)),
            },
            other => other,
        })
        .collect();
    Body::from_stmts(stmts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fntrace_ir::lift_fn;
    use syn::parse_quote;

    fn lifted(func: syn::ItemFn) -> (FnSig, Body) {
        lift_fn(&func).expect("lift failed")
    }

    fn count_exit_prints(body: &Body) -> usize {
        body.stmts
            .iter()
            .map(|stmt| match stmt {
                Stmt::TracedReturn(_) | Stmt::TraceFallThrough => 1,
                Stmt::If {
                    then_body,
                    else_body,
                    ..
                } => {
                    count_exit_prints(then_body)
                        + else_body.as_ref().map_or(0, count_exit_prints)
                }
                Stmt::Guard(inner) => count_exit_prints(inner),
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn test_disabled_is_identity() {
        let (sig, body) = lifted(parse_quote! {
            fn f(input: &str) -> usize {
                if input.is_empty() {
                    return 0;
                }
                input.len()
            }
        });
        let original = body.clone();
        let result = instrument(&sig, body, false).unwrap();
        assert_eq!(result, original);
    }

    #[test]
    fn test_enabled_shape() {
        let (sig, body) = lifted(parse_quote! {
            fn f(x: i32) -> i32 {
                let y = x + 1;
                y
            }
        });
        let result = instrument(&sig, body, true).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.stmts[0], Stmt::TraceEntry);
        assert_eq!(result.stmts[1], Stmt::MarkStart);
        let Stmt::Guard(inner) = &result.stmts[2] else {
            panic!("expected guard");
        };
        // Opaque statement preserved in order, tail return traced.
        assert!(matches!(inner.stmts[0], Stmt::Opaque(_)));
        assert!(matches!(inner.stmts[1], Stmt::TracedReturn(Some(_))));
    }

    #[test]
    fn test_exit_print_counts() {
        // k explicit returns, no fall-through.
        let (sig, body) = lifted(parse_quote! {
            fn f(input: &str) -> &'static str {
                if input == "a" {
                    return "first";
                }
                if input == "b" {
                    return "second";
                }
                "third"
            }
        });
        let result = instrument(&sig, body, true).unwrap();
        assert_eq!(count_exit_prints(&result), 3);

        // k explicit returns plus one reachable fall-through.
        let (sig, body) = lifted(parse_quote! {
            fn g(input: &str) {
                if input == "a" {
                    return;
                }
                if input == "b" {
                    return;
                }
            }
        });
        let result = instrument(&sig, body, true).unwrap();
        assert_eq!(count_exit_prints(&result), 3);
    }

    #[test]
    fn test_void_fall_through_has_no_value() {
        let (sig, body) = lifted(parse_quote! {
            fn f() {
                let _ = 1 + 1;
            }
        });
        let result = instrument(&sig, body, true).unwrap();
        let Stmt::Guard(inner) = &result.stmts[2] else {
            panic!("expected guard");
        };
        assert_eq!(inner.stmts.last(), Some(&Stmt::TraceFallThrough));
    }

    #[test]
    fn test_terminal_void_body_gets_no_fall_through() {
        let (sig, body) = lifted(parse_quote! {
            fn f(x: i32) {
                if x > 0 {
                    return;
                } else {
                    return;
                }
            }
        });
        let result = instrument(&sig, body, true).unwrap();
        let Stmt::Guard(inner) = &result.stmts[2] else {
            panic!("expected guard");
        };
        assert_ne!(inner.stmts.last(), Some(&Stmt::TraceFallThrough));
        assert_eq!(count_exit_prints(&result), 2);
    }

    #[test]
    fn test_instrumented_input_rejected() {
        let (sig, body) = lifted(parse_quote! {
            fn f() {
                let _ = 0;
            }
        });
        let once = instrument(&sig, body, true).unwrap();
        let again = instrument(&sig, once, true);
        assert_eq!(again, Err(InstrumentError::AlreadyInstrumented));
    }
}
