//! Hot reloading of a shared library's exported functions.
//!
//! A [`LibraryMaintainer`] owns one OS library handle and a small table of
//! symbol names the caller is interested in. The caller registers names,
//! triggers resolution, and may later release the library or reload it in
//! place; resolved addresses are re-bound against whichever instance of the
//! library is currently loaded.
//!
//! ```no_run
//! use hotlink::LibraryMaintainer;
//!
//! let mut maintainer = unsafe { LibraryMaintainer::new("libshared.so") };
//! maintainer.register_symbol("print_text");
//! maintainer.resolve_all().expect("`print_text` is exported");
//!
//! let address = maintainer
//!     .symbol_address("print_text")
//!     .and_then(|address| address.current())
//!     .expect("`print_text` was just resolved");
//!
//! // The maintainer has no knowledge of symbol signatures; casting the raw
//! // address to the correct one is the caller's responsibility.
//! let print_text: extern "C" fn() = unsafe { std::mem::transmute(address) };
//! print_text();
//! ```
//!
//! # Diagnostics
//!
//! Every OS-level failure is reported through an injectable
//! [`DiagnosticSink`] accepted at construction. The default sink discards
//! all messages; [`LogSink`] forwards them to the [log] facade. This crate
//! does not install a logger.
//!
//! [log]: https://docs.rs/log

#![warn(missing_docs)]

mod diagnostics;
mod error;
mod library;
mod maintainer;
mod symbol_table;

pub use crate::{
    diagnostics::{DiagnosticKind, DiagnosticSink, LogSink, NopSink},
    error::{LoadError, ReloadError, ResolveError, UnloadError},
    library::{LoadStrategy, SharedLibrary},
    maintainer::{LibraryMaintainer, MaintainerBuilder},
    symbol_table::SymbolAddress,
};
