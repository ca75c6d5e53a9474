use std::fmt;

/// The category of a diagnostic; one per failure call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The OS rejected a library load, or the file could not be prepared.
    LoadFailure,
    /// A registered symbol is absent from the currently loaded library.
    ResolveFailure,
    /// The OS refused to unload the library.
    UnloadFailure,
    /// A lookup or removal referenced a name that was never registered.
    SymbolNotRegistered,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::LoadFailure => "load failure",
            DiagnosticKind::ResolveFailure => "resolve failure",
            DiagnosticKind::UnloadFailure => "unload failure",
            DiagnosticKind::SymbolNotRegistered => "symbol not registered",
        };
        f.write_str(name)
    }
}

/// A channel for human-readable failure reports.
///
/// A [`LibraryMaintainer`](crate::LibraryMaintainer) calls into its sink at
/// the point of every failure, in addition to reflecting the failure in the
/// operation's return value. Implementations must not panic.
pub trait DiagnosticSink {
    /// Reports a single free-text diagnostic.
    fn report(&self, kind: DiagnosticKind, message: &str);
}

/// A sink that discards every diagnostic. This is the default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NopSink;

impl DiagnosticSink for NopSink {
    fn report(&self, _kind: DiagnosticKind, _message: &str) {}
}

/// A sink that forwards every diagnostic to the [log] facade at error level.
///
/// [log]: https://docs.rs/log
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, kind: DiagnosticKind, message: &str) {
        log::error!("{kind}: {message}");
    }
}
