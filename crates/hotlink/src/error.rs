use std::io;

/// An error that occurs while loading a shared library.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Failed to create the temporary file for a temp-copy load.
    #[error("failed to create a named temp file: {0}")]
    CreateTempFile(io::Error),
    /// Failed to copy the library to its temporary location.
    #[error("failed to copy shared library: {0}")]
    CopyLibrary(io::Error),
    /// The OS rejected the load.
    #[error("failed to load shared library: {0}")]
    Os(#[from] libloading::Error),
}

/// An error that occurs while resolving registered symbols.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Resolution was requested while no library is loaded. No lookups were
    /// attempted.
    #[error("no library is loaded, load or reload it first")]
    NotLoaded,
    /// One or more registered symbols are absent from the loaded library.
    ///
    /// Resolution visits every entry regardless: symbols that did resolve
    /// keep their fresh addresses, so partial success is usable but still
    /// flagged as failure.
    #[error("failed to resolve symbol(s): {}", .failed.join(", "))]
    Unresolved {
        /// Every registered name that could not be resolved.
        failed: Vec<String>,
    },
}

/// An error that occurs during a reload cycle.
#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    /// Re-acquiring the library failed; the maintainer is left unloaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The library was re-acquired but resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// An error reported by the OS while unloading a library.
///
/// The maintainer clears its handle even when the OS reports an unload
/// failure, so this error never leaves it stuck in the loaded state.
#[derive(Debug, thiserror::Error)]
#[error("failed to unload shared library: {0}")]
pub struct UnloadError(#[from] libloading::Error);
