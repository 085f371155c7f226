//! Account identifiers
//!
//! Accounts are 20-byte Ethereum addresses. `ethereum_types::Address`
//! already parses and prints the `0x`-prefixed hex form, so it is re-exported
//! rather than wrapped.

pub use ethereum_types::Address;

/// Shorten a hex address for display: first 7 and last 5 characters
///
/// `0x920977dc3862cf8549425728cc56b36c5a012f39` becomes `0x92097...12f39`.
pub fn shorten_address(address: &Address) -> String {
    shorten(&format!("{address:?}"))
}

/// Shorten any address-like string; short inputs are returned unchanged
pub fn shorten(text: &str) -> String {
    const HEAD: usize = 7;
    const TAIL: usize = 5;

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= HEAD + TAIL {
        return text.to_string();
    }
    let head: String = chars[..HEAD].iter().collect();
    let tail: String = chars[chars.len() - TAIL..].iter().collect();
    format!("{head}...{tail}")
}
