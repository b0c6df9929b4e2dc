//! Lowering from instrumented IR to Rust tokens.
//!
//! Produces a replacement function item: original attributes, visibility
//! and signature with the instrumented block substituted. Generated
//! locals carry a `__fntrace_` prefix to stay out of the user's
//! namespace.

use fntrace_instrument::{entry_format, exit_format};
use fntrace_ir::{Body, FnSig, Stmt};
use proc_macro2::{Ident, Span, TokenStream};
use quote::{quote, ToTokens};
use tracing::debug;

/// Code generation configuration.
#[derive(Clone, Debug)]
pub struct EmitConfig {
    /// Path generated code uses to reach the runtime sink.
    pub rt_path: syn::Path,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            rt_path: syn::parse_quote!(::fntrace::rt),
        }
    }
}

/// Emits a replacement function item from instrumented IR.
pub struct Emitter<'a> {
    sig: &'a FnSig,
    config: EmitConfig,
}

impl<'a> Emitter<'a> {
    /// Create an emitter for one function.
    pub const fn new(sig: &'a FnSig, config: EmitConfig) -> Self {
        Self { sig, config }
    }

    /// Emit the full item with the instrumented block in place of the
    /// original one.
    pub fn emit_fn(&self, func: &syn::ItemFn, body: &Body) -> TokenStream {
        let attrs = &func.attrs;
        let vis = &func.vis;
        let sig = &func.sig;
        let stmts = self.emit_body(body);
        debug!(function = %self.sig.name, "emitted instrumented item");
        quote! {
            #(#attrs)*
            #vis #sig {
                #(#stmts)*
            }
        }
    }

    fn emit_body(&self, body: &Body) -> Vec<TokenStream> {
        body.stmts.iter().map(|stmt| self.emit_stmt(stmt)).collect()
    }

    fn emit_stmt(&self, stmt: &Stmt) -> TokenStream {
        let rt = &self.config.rt_path;
        match stmt {
            // A trailing expression statement in the IR is always
            // unit-typed (value tails were lifted to returns), so the
            // semicolon is safe and keeps inserted statements after it
            // syntactically valid.
            Stmt::Opaque(syn::Stmt::Expr(expr, None)) => quote! { #expr; },
            Stmt::Opaque(other) => other.to_token_stream(),
            Stmt::If {
                cond,
                then_body,
                else_body,
            } => {
                let then_stmts = self.emit_body(then_body);
                let else_arm = else_body.as_ref().map(|body| {
                    let stmts = self.emit_body(body);
                    quote! { else { #(#stmts)* } }
                });
                quote! { if #cond { #(#then_stmts)* } #else_arm }
            }
            Stmt::Return(Some(value)) => quote! { return #value; },
            Stmt::Return(None) => quote! { return; },
            Stmt::TraceEntry => {
                let format = entry_format(self.sig);
                let args = self.sig.params.iter().map(|param| &param.name);
                quote! { #rt::emit(::core::format_args!(#format #(, #args)*)); }
            }
            Stmt::MarkStart => {
                let mark = mark_ident();
                quote! { let #mark = ::std::time::Instant::now(); }
            }
            Stmt::TracedReturn(Some(value)) => {
                let ret = ret_ident();
                let print = self.exit_print(Some(&quote! { &#ret }));
                quote! {
                    {
                        let #ret = #value;
                        #print
                        return #ret;
                    }
                }
            }
            Stmt::TracedReturn(None) => {
                let print = self.exit_print(None);
                quote! {
                    {
                        #print
                        return;
                    }
                }
            }
            Stmt::TraceFallThrough => self.exit_print(None),
            Stmt::Guard(body) => {
                let inner = self.emit_body(body);
                let ret = ret_ident();
                let payload = panic_ident();
                let print = self.exit_print(Some(&quote! { #rt::panic_message(&*#payload) }));
                quote! {
                    match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(move || {
                        #(#inner)*
                    })) {
                        ::std::result::Result::Ok(#ret) => #ret,
                        ::std::result::Result::Err(#payload) => {
                            #print
                            ::std::panic::resume_unwind(#payload)
                        }
                    }
                }
            }
        }
    }

    /// Emit one exit print: elapsed from the monotonic mark, plus the
    /// value rendering when the exit carries one.
    fn exit_print(&self, value: Option<&TokenStream>) -> TokenStream {
        let rt = &self.config.rt_path;
        let mark = mark_ident();
        let format = exit_format(self.sig, value.is_some());
        match value {
            Some(value) => {
                quote! { #rt::emit(::core::format_args!(#format, #mark.elapsed(), #value)); }
            }
            None => quote! { #rt::emit(::core::format_args!(#format, #mark.elapsed())); },
        }
    }
}

fn mark_ident() -> Ident {
    Ident::new("__fntrace_start", Span::call_site())
}

fn ret_ident() -> Ident {
    Ident::new("__fntrace_ret", Span::call_site())
}

fn panic_ident() -> Ident {
    Ident::new("__fntrace_panic", Span::call_site())
}
