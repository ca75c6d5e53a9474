mod util;

use std::fs;

use hotlink::{LibraryMaintainer, LoadStrategy, MaintainerBuilder, ReloadError};

#[test]
fn reload_rebinds_every_registered_symbol() {
    let mut maintainer = unsafe { LibraryMaintainer::new(util::fixture_library()) };
    maintainer.register_symbol("fixture_add");
    maintainer.register_symbol("fixture_version");
    maintainer.resolve_all().expect("exported");

    unsafe { maintainer.reload() }.expect("re-acquire and re-resolve");
    assert!(maintainer.is_loaded());

    for name in ["fixture_add", "fixture_version"] {
        let address = maintainer.symbol_address(name).expect("registered");
        assert!(!address.is_stale());
        assert!(address.current().is_some());
    }
}

#[test]
fn reload_after_release_reacquires() {
    let mut maintainer = unsafe { LibraryMaintainer::new(util::fixture_library()) };
    maintainer.register_symbol("fixture_version");
    maintainer.resolve_all().expect("exported");

    maintainer.release().expect("OS unload");
    assert!(!maintainer.is_loaded());

    unsafe { maintainer.reload() }.expect("re-acquire after release");
    assert!(maintainer.is_loaded());

    let address = maintainer
        .symbol_address("fixture_version")
        .expect("registered")
        .current()
        .expect("re-resolved");
    let version: extern "C" fn() -> u32 = unsafe { std::mem::transmute(address) };
    assert_eq!(version(), 1);
}

#[test]
fn temp_copy_loads_survive_overwriting_the_original() {
    let dir = tempfile::tempdir().expect("temp dir");
    let library_path = dir.path().join(util::fixture_file_name());
    fs::copy(util::fixture_library(), &library_path).expect("stage the library");

    let mut maintainer = unsafe {
        MaintainerBuilder::new(&library_path)
            .load_strategy(LoadStrategy::TempCopy)
            .load()
    };
    assert!(maintainer.is_loaded());
    maintainer.register_symbol("fixture_version");
    maintainer.resolve_all().expect("exported");

    // The loaded instance is a temp copy, so the original file is free to
    // be replaced while the library is in use.
    fs::copy(util::fixture_library(), &library_path).expect("overwrite while loaded");

    unsafe { maintainer.reload() }.expect("reload the overwritten library");
    assert!(maintainer
        .symbol_address("fixture_version")
        .expect("registered")
        .current()
        .is_some());
}

#[test]
fn failed_reload_leaves_the_maintainer_unloaded_and_addresses_stale() {
    let dir = tempfile::tempdir().expect("temp dir");
    let library_path = dir.path().join(util::fixture_file_name());
    fs::copy(util::fixture_library(), &library_path).expect("stage the library");

    let mut maintainer = unsafe {
        MaintainerBuilder::new(&library_path)
            .load_strategy(LoadStrategy::TempCopy)
            .load()
    };
    maintainer.register_symbol("fixture_version");
    maintainer.resolve_all().expect("exported");

    fs::remove_file(&library_path).expect("remove the library file");

    match unsafe { maintainer.reload() } {
        Err(ReloadError::Load(_)) => {}
        other => panic!("expected a load error, got {other:?}"),
    }
    assert!(!maintainer.is_loaded());

    let address = maintainer
        .symbol_address("fixture_version")
        .expect("registered");
    assert!(address.is_stale());
    assert!(address.current().is_none());
}
