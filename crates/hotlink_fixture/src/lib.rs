//! C-ABI exports loaded by the `hotlink` integration tests.
//!
//! The exported names are resolved by address only; the tests cast them to
//! the matching signatures themselves.

/// Prints a line of text.
#[no_mangle]
pub extern "C" fn print_text() {
    println!("hello from the fixture library");
}

/// Adds two numbers.
#[no_mangle]
pub extern "C" fn fixture_add(lhs: i32, rhs: i32) -> i32 {
    lhs.wrapping_add(rhs)
}

/// Reports the fixture version.
#[no_mangle]
pub extern "C" fn fixture_version() -> u32 {
    1
}
