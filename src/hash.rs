//! Hash functions for class-name and component-id computation.
//!
//! Uses a djb2-family hash folded from the end of the input, operating on
//! UTF-16 code units so names agree with any other producer of the same
//! stylesheet format. All arithmetic wraps at 32 bits.

/// Initial value for [`hash`].
pub const DJB2_SEED: u32 = 5381;

/// Hash of the engine version; every class-name hash starts from it.
pub const SEED: u32 = ascii_hash(crate::SC_VERSION);

/// Number of letters in the class-name alphabet (`a-z` then `A-Z`).
const CHARS_LENGTH: u32 = 52;

/// Fold `input` into a running hash `h`.
///
/// Code units are consumed from last to first, so `phash(phash(h, a), b)`
/// differs from `phash(h, a + b)`; callers rely on the fold, not on
/// concatenation equivalence.
#[inline]
pub fn phash(mut h: u32, input: &str) -> u32 {
    if input.is_ascii() {
        for &b in input.as_bytes().iter().rev() {
            h = h.wrapping_mul(33) ^ b as u32;
        }
    } else {
        let units: Vec<u16> = input.encode_utf16().collect();
        for &unit in units.iter().rev() {
            h = h.wrapping_mul(33) ^ unit as u32;
        }
    }
    h
}

/// Hash a string from [`DJB2_SEED`].
#[inline]
pub fn hash(input: &str) -> u32 {
    phash(DJB2_SEED, input)
}

/// [`hash`] for ASCII input, usable in constants.
const fn ascii_hash(input: &str) -> u32 {
    let bytes = input.as_bytes();
    let mut h = DJB2_SEED;
    let mut i = bytes.len();
    while i > 0 {
        i -= 1;
        h = h.wrapping_mul(33) ^ bytes[i] as u32;
    }
    h
}

#[inline]
const fn alphabetic_char(code: u32) -> char {
    // 0..=25 -> 'a'..='z', 26..=51 -> 'A'..='Z'
    let base = if code > 25 { 39 } else { 97 };
    (code + base) as u8 as char
}

/// Map a 32-bit hash to a short identifier made of ASCII letters.
///
/// The result never starts with a digit and never contains the sequence
/// `ad` (case-insensitive); a hyphen is inserted between the two letters
/// so ad-blocking filters leave the class alone.
pub fn generate_alphabetic_name(code: u32) -> String {
    let mut reversed = Vec::with_capacity(7);
    let mut x = code;
    while x > CHARS_LENGTH {
        reversed.push(alphabetic_char(x % CHARS_LENGTH));
        x /= CHARS_LENGTH;
    }
    reversed.push(alphabetic_char(x % CHARS_LENGTH));

    let mut name = String::with_capacity(reversed.len() + 2);
    let mut prev: Option<char> = None;
    for c in reversed.into_iter().rev() {
        if matches!(prev, Some('a' | 'A')) && matches!(c, 'd' | 'D') {
            name.push('-');
        }
        name.push(c);
        prev = Some(c);
    }
    name
}

/// Hash arbitrary text straight to an alphabetic identifier.
#[inline]
pub fn generate_component_id(input: &str) -> String {
    generate_alphabetic_name(hash(input))
}
