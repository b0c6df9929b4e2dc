//! Exit-point discovery.

use fntrace_ir::{Body, ReturnKind, Stmt};
use tracing::debug;

/// A position from which control leaves the function normally.
///
/// Unwinds are not exit points; they are handled by the guard region.
#[derive(Clone, Debug, PartialEq)]
pub struct ExitPoint {
    /// Child indices from the body root to the statement.
    pub path: Vec<usize>,
    /// Returned value expression, if any.
    pub value: Option<syn::Expr>,
    /// Explicit `return` as opposed to the implicit fall-through.
    pub explicit: bool,
}

impl ExitPoint {
    /// Check if this exit carries a value.
    pub const fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

/// Discover every normal exit of `body`.
///
/// Explicit returns are collected recursively through `if` branches. The
/// implicit end-of-body exit exists only for void functions whose body is
/// not already terminal.
pub fn find_exits(body: &Body, ret: ReturnKind) -> Vec<ExitPoint> {
    let mut exits = Vec::new();
    walk(body, &mut Vec::new(), &mut exits);
    if ret.is_void() && !body.is_terminal() {
        exits.push(ExitPoint {
            path: vec![body.len()],
            value: None,
            explicit: false,
        });
    }
    debug!(exits = exits.len(), "discovered exit points");
    exits
}

fn walk(body: &Body, path: &mut Vec<usize>, exits: &mut Vec<ExitPoint>) {
    for (index, stmt) in body.stmts.iter().enumerate() {
        path.push(index);
        match stmt {
            Stmt::Return(value) => exits.push(ExitPoint {
                path: path.clone(),
                value: value.clone(),
                explicit: true,
            }),
            Stmt::If {
                then_body,
                else_body,
                ..
            } => {
                walk(then_body, path, exits);
                if let Some(else_body) = else_body {
                    walk(else_body, path, exits);
                }
            }
            Stmt::Opaque(_) => {}
            // Inserted kinds never appear in pristine input; the rewrite
            // rejects them before discovery runs.
            Stmt::TraceEntry
            | Stmt::MarkStart
            | Stmt::TracedReturn(_)
            | Stmt::TraceFallThrough
            | Stmt::Guard(_) => {}
        }
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fntrace_ir::lift_fn;
    use syn::parse_quote;

    fn exits_of(func: syn::ItemFn) -> Vec<ExitPoint> {
        let (sig, body) = lift_fn(&func).expect("lift failed");
        find_exits(&body, sig.ret)
    }

    #[test]
    fn test_straight_line_value_fn_single_exit() {
        let exits = exits_of(parse_quote! {
            fn f(x: i32) -> i32 {
                let y = x + 1;
                y * 2
            }
        });
        assert_eq!(exits.len(), 1);
        assert!(exits[0].explicit);
        assert!(exits[0].has_value());
    }

    #[test]
    fn test_void_fn_implicit_exit_only() {
        let exits = exits_of(parse_quote! {
            fn f() {
                let _ = 1 + 1;
            }
        });
        assert_eq!(exits.len(), 1);
        assert!(!exits[0].explicit);
        assert!(!exits[0].has_value());
    }

    #[test]
    fn test_three_returns_no_implicit() {
        let exits = exits_of(parse_quote! {
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
        assert_eq!(exits.len(), 3);
        assert!(exits.iter().all(|e| e.explicit && e.has_value()));
    }

    #[test]
    fn test_void_early_return_plus_fall_through() {
        let exits = exits_of(parse_quote! {
            fn f(input: &str) {
                if input == "a" {
                    return;
                }
                let _ = input.len();
            }
        });
        assert_eq!(exits.len(), 2);
        assert!(exits[0].explicit);
        assert!(!exits[1].explicit);
    }

    #[test]
    fn test_terminal_if_else_void_fn_no_implicit() {
        let exits = exits_of(parse_quote! {
            fn f(x: i32) {
                if x > 0 {
                    return;
                } else {
                    return;
                }
            }
        });
        assert_eq!(exits.len(), 2);
        assert!(exits.iter().all(|e| e.explicit));
    }

    #[test]
    fn test_tail_if_chain_counts_each_branch() {
        let exits = exits_of(parse_quote! {
            fn f(x: i32) -> i32 {
                if x > 0 {
                    1
                } else if x < 0 {
                    -1
                } else {
                    0
                }
            }
        });
        assert_eq!(exits.len(), 3);
    }
}
