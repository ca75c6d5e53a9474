use std::{collections::BTreeMap, ffi::c_void};

/// The ordered name-to-address table owned by a maintainer.
///
/// A single `BTreeMap` keyed by symbol name, so resolution and diagnostics
/// visit entries in a deterministic order and duplicate registration has
/// exactly one meaning: the entry is overwritten and reset to unresolved.
#[derive(Debug, Default)]
pub(crate) struct SymbolTable {
    entries: BTreeMap<String, SymbolEntry>,
}

/// One registered symbol: its last cached address, if any, tagged with the
/// load generation it was resolved against.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SymbolEntry {
    pub address: Option<*mut c_void>,
    pub resolved_in: u64,
}

impl SymbolTable {
    /// Inserts `name` with an absent address. An existing entry is replaced,
    /// discarding any previously resolved address.
    pub fn register(&mut self, name: String) {
        self.entries.insert(name, SymbolEntry::default());
    }

    /// Removes the entry for `name`, returning whether it was present.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.get(name)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut SymbolEntry)> {
        self.entries.iter_mut()
    }

    /// The registered names, in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// The outcome of a passive symbol lookup.
///
/// Carries whatever address the table last cached for a registered name.
/// Cached values survive `release` and failed reloads; [`is_stale`] reports
/// whether the value still corresponds to the currently loaded library, and
/// [`current`] refuses to hand out anything stale.
///
/// [`is_stale`]: SymbolAddress::is_stale
/// [`current`]: SymbolAddress::current
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolAddress {
    raw: Option<*mut c_void>,
    stale: bool,
}

impl SymbolAddress {
    pub(crate) fn new(raw: Option<*mut c_void>, stale: bool) -> Self {
        SymbolAddress { raw, stale }
    }

    /// True when an address is cached at all, stale or not.
    pub fn is_resolved(&self) -> bool {
        self.raw.is_some()
    }

    /// True when the cached address was not resolved against the currently
    /// loaded library, because the library was released or replaced since.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// The raw cached address, stale or not.
    ///
    /// Calling through a stale address is undefined behavior; unless the
    /// staleness has been checked separately, prefer [`current`].
    ///
    /// [`current`]: SymbolAddress::current
    pub fn raw(&self) -> Option<*mut c_void> {
        self.raw
    }

    /// The cached address, but only when it is live against the currently
    /// loaded library. The caller still must cast it to the correct
    /// function signature before calling through it.
    pub fn current(&self) -> Option<*mut c_void> {
        if self.stale {
            None
        } else {
            self.raw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SymbolAddress, SymbolTable};

    #[test]
    fn registration_starts_unresolved() {
        let mut table = SymbolTable::default();
        table.register("print_text".to_string());

        let entry = table.get("print_text").expect("just registered");
        assert!(entry.address.is_none());
    }

    #[test]
    fn duplicate_registration_discards_the_resolved_address() {
        let mut table = SymbolTable::default();
        table.register("print_text".to_string());
        for (_, entry) in table.iter_mut() {
            entry.address = Some(0x1000 as *mut _);
            entry.resolved_in = 1;
        }

        table.register("print_text".to_string());
        let entry = table.get("print_text").expect("still registered");
        assert!(entry.address.is_none());
        assert_eq!(entry.resolved_in, 0);
    }

    #[test]
    fn unregister_reports_presence() {
        let mut table = SymbolTable::default();
        table.register("print_text".to_string());

        assert!(table.unregister("print_text"));
        assert!(!table.unregister("print_text"));
        assert!(table.get("print_text").is_none());
    }

    #[test]
    fn names_are_ordered() {
        let mut table = SymbolTable::default();
        table.register("zeta".to_string());
        table.register("alpha".to_string());

        let names: Vec<_> = table.names().collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }

    #[test]
    fn stale_addresses_are_readable_but_not_current() {
        let address = SymbolAddress::new(Some(0x1000 as *mut _), true);
        assert!(address.is_resolved());
        assert!(address.is_stale());
        assert!(address.raw().is_some());
        assert!(address.current().is_none());
    }
}
