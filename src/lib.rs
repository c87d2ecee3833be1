// src/lib.rs
pub mod context;
pub mod diagnostics;
pub mod frontend;
pub mod globals;
pub mod names;
pub mod sig;
pub mod symbols;
pub mod types;
pub mod well_known;

pub use context::{Context, MutableContext};
pub use diagnostics::{Diagnostic, DiagnosticBuffer, ErrorCategory};
pub use globals::{CheckerConfig, GlobalState, SymbolTableError};
pub use names::{NameRef, NameTable, UniqueNameKind};
pub use sig::{ParsedSig, SeenFlags};
pub use symbols::{ArgInfo, ArgKind, Symbol, SymbolKind, SymbolRef, Variance};
pub use types::{LiteralValue, Type};

/// Internal invariant check. A failure is a bug in the checker itself,
/// never a user error, and aborts immediately. Kind-mismatched symbol
/// accessors and impossible variance states go through this.
#[macro_export]
macro_rules! checker_assert {
    ($cond:expr $(,)?) => {
        assert!($cond, "checker invariant violated: {}", stringify!($cond));
    };
    ($cond:expr, $($fmt:tt)+) => {
        assert!($cond, $($fmt)+);
    };
}
