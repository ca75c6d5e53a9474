use std::{ffi::c_void, fs, path::Path};

use libloading::Library;

use crate::error::{LoadError, UnloadError};

/// How a [`LibraryMaintainer`](crate::LibraryMaintainer) turns a path into a
/// loaded library.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Load the path as given, resolved via the OS's standard
    /// dynamic-library search rules.
    #[default]
    Direct,
    /// Copy the file to a unique temporary path and load the copy.
    ///
    /// The original file stays free to be rebuilt or overwritten while
    /// loaded, and each reload maps a genuinely fresh object instead of
    /// rebinding the one the OS already cached. Requires an actual file
    /// path rather than a bare library name.
    TempCopy,
}

/// One loaded instance of a shared library.
///
/// Owns the OS handle together with the load generation that produced it.
/// Under [`LoadStrategy::TempCopy`] the instance also keeps its temporary
/// file path alive for as long as the handle is open. There is no risk of
/// the temporary file being cleaned up while in use: loading keeps the file
/// open on Windows, and keeping the file is not required on *nix.
pub struct SharedLibrary {
    library: Library,
    _tmp_path: Option<tempfile::TempPath>,
    generation: u64,
}

impl SharedLibrary {
    /// Loads the library at `path`.
    ///
    /// # Safety
    ///
    /// When a library is loaded, initialisation routines contained within
    /// it are executed. For the purposes of safety, the execution of these
    /// routines is conceptually the same as calling an unknown foreign
    /// function and may impose arbitrary requirements on the caller for the
    /// call to be sound. The same holds for the termination routines
    /// executed when the library is unloaded.
    ///
    /// See [`libloading::Library::new`] for more information.
    pub unsafe fn load(
        path: &Path,
        strategy: LoadStrategy,
        generation: u64,
    ) -> Result<Self, LoadError> {
        let (library, tmp_path) = match strategy {
            LoadStrategy::Direct => (Library::new(path)?, None),
            LoadStrategy::TempCopy => {
                let tmp_path = tempfile::NamedTempFile::new()
                    .map_err(LoadError::CreateTempFile)?
                    .into_temp_path();
                fs::copy(path, &tmp_path).map_err(LoadError::CopyLibrary)?;
                (Library::new(&tmp_path)?, Some(tmp_path))
            }
        };

        Ok(SharedLibrary {
            library,
            _tmp_path: tmp_path,
            generation,
        })
    }

    /// The ordinal of the successful load that produced this instance.
    /// Resolved addresses are tagged with it to make staleness detectable.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolves `name` against this instance and returns the raw address.
    ///
    /// The address is only ever stored and handed back to the caller; it is
    /// never called from within this crate. Symbol names are matched by
    /// exact byte equality against the library's export table.
    pub fn get(&self, name: &str) -> Result<*mut c_void, libloading::Error> {
        // `Symbol<*mut c_void>` dereferences to the raw symbol address
        // without carrying the library's lifetime.
        let symbol: libloading::Symbol<'_, *mut c_void> =
            unsafe { self.library.get(name.as_bytes()) }?;
        Ok(*symbol)
    }

    /// Unloads the library, surfacing any OS-level failure.
    pub fn close(self) -> Result<(), UnloadError> {
        self.library.close().map_err(UnloadError::from)
    }
}
