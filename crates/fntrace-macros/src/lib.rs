//! Attribute macro surface wiring the instrumenter into expansion.
//!
//! The heavy lifting lives in `fntrace-ir` / `fntrace-instrument` /
//! `fntrace-emit`; this crate only parses the item, reads the gate and
//! maps errors to spanned compile errors.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};

use fntrace_emit::{EmitConfig, Emitter};
use fntrace_instrument::{instrument, Gate};
use fntrace_ir::lift_fn;

/// Trace a function's entry and every exit.
///
/// On entry the function name and argument values are printed; on every
/// exit the elapsed time and, for value-returning functions, the returned
/// value. Panics are printed the same way and rethrown unchanged.
///
/// The transform only runs when the compilation unit was built with
/// `FNTRACE_ENABLED=true`; otherwise the attribute leaves the function
/// untouched.
#[proc_macro_attribute]
pub fn trace(attr: TokenStream, item: TokenStream) -> TokenStream {
    match expand(attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(attr: TokenStream2, item: TokenStream2) -> syn::Result<TokenStream2> {
    let gate = Gate::from_env()
        .map_err(|err| syn::Error::new(Span::call_site(), err.to_string()))?;
    init_diagnostics(&gate);
    expand_with(&gate, attr, item)
}

/// Expansion with an explicit gate, separated so tests can exercise both
/// gate states without touching the process environment.
fn expand_with(gate: &Gate, attr: TokenStream2, item: TokenStream2) -> syn::Result<TokenStream2> {
    if !attr.is_empty() {
        return Err(syn::Error::new_spanned(
            &attr,
            "unexpected attribute arguments; #[trace] takes none",
        ));
    }
    if !gate.is_enabled() {
        // Disabled gate: hand the tokens back untouched.
        return Ok(item);
    }

    let func: syn::ItemFn = syn::parse2(item)?;
    let (sig, body) =
        lift_fn(&func).map_err(|err| syn::Error::new(err.span(), err.to_string()))?;
    let traced = instrument(&sig, body, gate.is_enabled())
        .map_err(|err| syn::Error::new(Span::call_site(), err.to_string()))?;
    Ok(Emitter::new(&sig, EmitConfig::default()).emit_fn(&func, &traced))
}

/// Install a stderr subscriber when `FNTRACE_LOG` asks for expansion
/// diagnostics. Repeat installs are no-ops.
fn init_diagnostics(gate: &Gate) {
    if let Some(filter) = gate.log_filter() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
