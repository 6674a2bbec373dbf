//! Legacy (non-UTF-8-flagged) filename encoding.
//!
//! When general-purpose bit 11 is clear, ZIP filenames are IBM Code Page
//! 437. This crate leans on the `codepage-437` crate (as `piz` does) rather
//! than shipping a hand-rolled 256-entry table.

use codepage_437::{BorrowFromCp437, ToCp437, CP437_CONTROL};
use std::borrow::Cow;

/// Decodes CP437 bytes into a native `String`.
pub fn decode(bytes: &[u8]) -> String {
    let cow: Cow<str> = Cow::borrow_from_cp437(bytes, &CP437_CONTROL);
    cow.into_owned()
}

/// Encodes a `String` as CP437 bytes, if every character is representable.
pub fn encode(s: &str) -> Option<Vec<u8>> {
    s.to_cp437(&CP437_CONTROL).map(|cow| cow.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trips() {
        let path = "docs/readme.md";
        let encoded = encode(path).unwrap();
        assert_eq!(decode(&encoded), path);
    }

    #[test]
    fn non_representable_character_fails_to_encode() {
        assert!(encode("日本語.txt").is_none());
    }
}
