use std::path::{Path, PathBuf};

use crate::{
    diagnostics::{DiagnosticKind, DiagnosticSink, NopSink},
    error::{LoadError, ReloadError, ResolveError, UnloadError},
    library::{LoadStrategy, SharedLibrary},
    symbol_table::{SymbolAddress, SymbolTable},
};

/// A builder for a [`LibraryMaintainer`].
pub struct MaintainerBuilder {
    path: PathBuf,
    strategy: LoadStrategy,
    sink: Box<dyn DiagnosticSink>,
}

impl MaintainerBuilder {
    /// Constructs a builder for the shared library at `path`, with the
    /// default load strategy and a no-op diagnostic sink.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        MaintainerBuilder {
            path: path.into(),
            strategy: LoadStrategy::default(),
            sink: Box::new(NopSink),
        }
    }

    /// Selects how the library file is turned into a loaded instance.
    pub fn load_strategy(mut self, strategy: LoadStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Installs a sink that receives a diagnostic on every failure path.
    pub fn diagnostic_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Builds the maintainer and immediately attempts the initial load.
    ///
    /// A load failure is reported through the sink and leaves the maintainer
    /// unloaded but usable; the caller may retry via
    /// [`LibraryMaintainer::reload`].
    ///
    /// # Safety
    ///
    /// Loading a library executes its initialisation routines, and a later
    /// unload executes its termination routines. Both are conceptually the
    /// same as calling an unknown foreign function; see
    /// [`libloading::Library::new`].
    pub unsafe fn load(self) -> LibraryMaintainer {
        let mut maintainer = LibraryMaintainer {
            path: self.path,
            strategy: self.strategy,
            library: None,
            symbols: SymbolTable::default(),
            generation: 0,
            sink: self.sink,
        };
        let _ = maintainer.acquire();
        maintainer
    }
}

/// Maintains the load/unload cycle of one shared library and the resolution
/// of a set of named symbols against whichever instance of that library is
/// currently loaded.
///
/// The maintainer is single-threaded by construction: the raw addresses it
/// caches make it neither `Send` nor `Sync`, so concurrent reload-while-call
/// hazards cannot arise without deliberate external sharing.
///
/// Dropping the maintainer releases the library; cached addresses are then
/// stale but remain readable through [`symbol_address`].
///
/// [`symbol_address`]: LibraryMaintainer::symbol_address
pub struct LibraryMaintainer {
    path: PathBuf,
    strategy: LoadStrategy,
    library: Option<SharedLibrary>,
    symbols: SymbolTable,
    generation: u64,
    sink: Box<dyn DiagnosticSink>,
}

impl LibraryMaintainer {
    /// Constructs a maintainer for the library at `path` and immediately
    /// attempts to load it, with the default strategy and a no-op sink.
    /// Equivalent to `MaintainerBuilder::new(path).load()`.
    ///
    /// Never panics: a load failure leaves the maintainer unloaded but
    /// usable, observable via [`is_loaded`] and the diagnostic sink.
    ///
    /// # Safety
    ///
    /// See [`MaintainerBuilder::load`].
    ///
    /// [`is_loaded`]: LibraryMaintainer::is_loaded
    pub unsafe fn new<P: Into<PathBuf>>(path: P) -> Self {
        MaintainerBuilder::new(path).load()
    }

    /// The path the maintainer was constructed with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff a library handle is currently held. Pure query.
    pub fn is_loaded(&self) -> bool {
        self.library.is_some()
    }

    /// Adds `name` to the symbol table with an absent address. Touches only
    /// the table, never the library; call [`resolve_all`] afterwards.
    ///
    /// Re-registering an existing name overwrites the entry, resetting it to
    /// unresolved and discarding any previously resolved address.
    ///
    /// [`resolve_all`]: LibraryMaintainer::resolve_all
    pub fn register_symbol(&mut self, name: impl Into<String>) {
        self.symbols.register(name.into());
    }

    /// Removes `name` from the symbol table, returning whether it was
    /// present. An absent name is non-fatal and reported through the sink.
    pub fn unregister_symbol(&mut self, name: &str) -> bool {
        let removed = self.symbols.unregister(name);
        if !removed {
            self.sink.report(
                DiagnosticKind::SymbolNotRegistered,
                &format!("cannot unregister `{name}`: it was never registered"),
            );
        }
        removed
    }

    /// Resolves every registered symbol against the currently loaded
    /// library.
    ///
    /// Fails immediately with [`ResolveError::NotLoaded`] when no library is
    /// held, attempting no lookups. Otherwise every entry is visited: a
    /// successful lookup stores the fresh address, a failed one stores
    /// absent and is reported through the sink. If any entry failed the
    /// whole pass returns [`ResolveError::Unresolved`] naming the failures,
    /// even though the successful entries keep their fresh addresses.
    pub fn resolve_all(&mut self) -> Result<(), ResolveError> {
        let Some(library) = self.library.as_ref() else {
            self.sink.report(
                DiagnosticKind::ResolveFailure,
                "cannot resolve symbols: no library is loaded",
            );
            return Err(ResolveError::NotLoaded);
        };

        let mut failed = Vec::new();
        for (name, entry) in self.symbols.iter_mut() {
            match library.get(name) {
                Ok(address) => {
                    entry.address = Some(address);
                    entry.resolved_in = library.generation();
                }
                Err(error) => {
                    entry.address = None;
                    self.sink.report(
                        DiagnosticKind::ResolveFailure,
                        &format!("failed to resolve `{name}`: {error}"),
                    );
                    failed.push(name.clone());
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(ResolveError::Unresolved { failed })
        }
    }

    /// Releases the current handle if one is held, then re-acquires the
    /// library at the maintainer's path and, on success, immediately runs
    /// [`resolve_all`].
    ///
    /// Unload failures on the way out are reported through the sink but
    /// never block the reload. If re-acquisition fails the maintainer is
    /// left unloaded and every previously resolved address is stale.
    ///
    /// # Safety
    ///
    /// See [`MaintainerBuilder::load`].
    ///
    /// [`resolve_all`]: LibraryMaintainer::resolve_all
    pub unsafe fn reload(&mut self) -> Result<(), ReloadError> {
        let _ = self.release();
        self.acquire()?;
        self.resolve_all()?;
        Ok(())
    }

    /// Unloads the library if one is held.
    ///
    /// On an OS-level unload failure the error is reported and returned, but
    /// the handle is still cleared: the maintainer always transitions to the
    /// unloaded state rather than staying stuck holding a handle it believes
    /// invalid. Idempotent; a second call is a no-op returning `Ok(())`.
    ///
    /// Cached addresses are not erased, only marked stale on lookup.
    pub fn release(&mut self) -> Result<(), UnloadError> {
        match self.library.take() {
            None => Ok(()),
            Some(library) => library.close().map_err(|error| {
                self.sink.report(
                    DiagnosticKind::UnloadFailure,
                    &format!("failed to unload `{}`: {error}", self.path.display()),
                );
                error
            }),
        }
    }

    /// Looks up the last cached address for `name`. Passive: never triggers
    /// resolution.
    ///
    /// Returns `None`, plus a diagnostic, when `name` was never registered.
    /// Otherwise the returned [`SymbolAddress`] carries the cached value,
    /// possibly absent and possibly stale; see [`SymbolAddress::current`]
    /// for the only accessor that filters out stale values.
    pub fn symbol_address(&self, name: &str) -> Option<SymbolAddress> {
        let Some(entry) = self.symbols.get(name) else {
            self.sink.report(
                DiagnosticKind::SymbolNotRegistered,
                &format!("symbol `{name}` was never registered"),
            );
            return None;
        };

        let live_generation = self.library.as_ref().map(SharedLibrary::generation);
        let stale = entry.address.is_some() && Some(entry.resolved_in) != live_generation;
        Some(SymbolAddress::new(entry.address, stale))
    }

    /// The registered symbol names, in table order.
    pub fn symbol_names(&self) -> impl Iterator<Item = &str> {
        self.symbols.names()
    }

    /// Loads the library at the maintainer's path, reporting a failure
    /// through the sink. Bumps the generation only on success, so stale
    /// tags from the previous instance stay stale.
    unsafe fn acquire(&mut self) -> Result<(), LoadError> {
        match SharedLibrary::load(&self.path, self.strategy, self.generation + 1) {
            Ok(library) => {
                self.generation += 1;
                self.library = Some(library);
                Ok(())
            }
            Err(error) => {
                self.sink.report(
                    DiagnosticKind::LoadFailure,
                    &format!("failed to load `{}`: {error}", self.path.display()),
                );
                Err(error)
            }
        }
    }
}

impl Drop for LibraryMaintainer {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
