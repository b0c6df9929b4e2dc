//! Function signature IR.

/// How a function yields its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnKind {
    /// No value leaves the function (`fn f()` or `-> ()`).
    Void,
    /// The function produces a value.
    Value,
}

impl ReturnKind {
    /// Check if this is the void kind.
    pub const fn is_void(self) -> bool {
        matches!(self, Self::Void)
    }
}

/// A single traced parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// Binding name, logged as `name=value`.
    pub name: syn::Ident,
    /// Sequence parameter, rendered with the collection's debug form.
    pub vararg: bool,
}

impl Param {
    /// Create a plain parameter.
    pub const fn new(name: syn::Ident) -> Self {
        Self {
            name,
            vararg: false,
        }
    }

    /// Create a sequence parameter.
    pub const fn vararg(name: syn::Ident) -> Self {
        Self { name, vararg: true }
    }
}

/// Function signature as seen by the instrumenter.
///
/// Receivers are not parameters; a method traces its named parameters
/// only.
#[derive(Clone, Debug, PartialEq)]
pub struct FnSig {
    /// Function name.
    pub name: syn::Ident,
    /// Parameters in declaration order.
    pub params: Vec<Param>,
    /// Result kind.
    pub ret: ReturnKind,
}

impl FnSig {
    /// Create a signature.
    pub const fn new(name: syn::Ident, params: Vec<Param>, ret: ReturnKind) -> Self {
        Self { name, params, ret }
    }
}
