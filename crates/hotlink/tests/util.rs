#![allow(dead_code)]

use std::{env, path::PathBuf, process::Command};

use once_cell::sync::Lazy;

/// Builds the `hotlink_fixture` cdylib (at most once per test binary) and
/// returns the path to the artifact.
///
/// `cargo test` on the workspace already builds the fixture, but running the
/// tests for this package alone does not, so the fixture is built explicitly
/// through the same `cargo` that is running the tests.
pub fn fixture_library() -> PathBuf {
    static FIXTURE: Lazy<PathBuf> = Lazy::new(|| {
        let cargo = env::var_os("CARGO").unwrap_or_else(|| "cargo".into());
        let status = Command::new(cargo)
            .args(["build", "--package", "hotlink_fixture"])
            .status()
            .expect("failed to run cargo to build the fixture library");
        assert!(status.success(), "failed to build the fixture library");

        let file_name = format!(
            "{}hotlink_fixture{}",
            env::consts::DLL_PREFIX,
            env::consts::DLL_SUFFIX
        );
        target_dir().join("debug").join(file_name)
    });
    FIXTURE.clone()
}

/// The name the fixture library would carry as a standalone artifact, used
/// when copying it into a temporary directory.
pub fn fixture_file_name() -> String {
    format!(
        "{}fixture_copy{}",
        env::consts::DLL_PREFIX,
        env::consts::DLL_SUFFIX
    )
}

fn target_dir() -> PathBuf {
    env::var_os("CARGO_TARGET_DIR").map_or_else(
        || {
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join("target")
        },
        PathBuf::from,
    )
}
