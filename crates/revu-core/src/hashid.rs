//! Opaque, reversible external identifiers.
//!
//! Primary keys are sequential integers; exposing them would leak row counts
//! and make ids guessable. Every id that crosses the API boundary goes through
//! a [`HashidCodec`] instead. The scheme follows the classic hashids design:
//! the alphabet is shuffled by the salt, a "lottery" character chosen from the
//! value reshuffles it again, and the value is written in that base.
//!
//! Decoding re-encodes the result and compares, so only canonical strings
//! decode. Everything else is `None`, which callers treat as "not found".

use crate::errors::CoreError;

/// Default 62-character alphabet.
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

const MIN_ALPHABET_LENGTH: usize = 16;

/// Salted encoder/decoder for integer primary keys.
#[derive(Debug, Clone)]
pub struct HashidCodec {
    salt: Vec<u8>,
    alphabet: Vec<u8>,
    min_length: usize,
}

impl HashidCodec {
    /// Build a codec over the default alphabet.
    #[must_use]
    pub fn new(salt: &str, min_length: usize) -> Self {
        let mut alphabet = DEFAULT_ALPHABET.as_bytes().to_vec();
        consistent_shuffle(&mut alphabet, salt.as_bytes());
        Self {
            salt: salt.as_bytes().to_vec(),
            alphabet,
            min_length,
        }
    }

    /// Build a codec over a custom alphabet.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidAlphabet` if the alphabet is shorter than 16
    /// characters, contains non-ASCII or whitespace characters, or repeats a
    /// character.
    pub fn with_alphabet(alphabet: &str, salt: &str, min_length: usize) -> Result<Self, CoreError> {
        if !alphabet.is_ascii() || alphabet.bytes().any(|b| b.is_ascii_whitespace()) {
            return Err(CoreError::InvalidAlphabet(
                "alphabet must be printable ASCII without spaces".into(),
            ));
        }
        let mut bytes = alphabet.as_bytes().to_vec();
        let mut seen = bytes.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != bytes.len() {
            return Err(CoreError::InvalidAlphabet(
                "alphabet contains duplicate characters".into(),
            ));
        }
        if bytes.len() < MIN_ALPHABET_LENGTH {
            return Err(CoreError::InvalidAlphabet(format!(
                "alphabet must contain at least {MIN_ALPHABET_LENGTH} characters"
            )));
        }
        consistent_shuffle(&mut bytes, salt.as_bytes());
        Ok(Self {
            salt: salt.as_bytes().to_vec(),
            alphabet: bytes,
            min_length,
        })
    }

    /// Encode a primary key. Negative keys encode as 0.
    #[must_use]
    pub fn encode(&self, id: i64) -> String {
        let value = u64::try_from(id).unwrap_or(0);
        let base = self.alphabet.len() as u64;

        let lottery = self.alphabet[digit_index(value, base)];
        let alphabet = self.round_alphabet(lottery);

        let mut digits = Vec::new();
        let mut rest = value;
        loop {
            digits.push(alphabet[digit_index(rest, base)]);
            rest /= base;
            if rest == 0 {
                break;
            }
        }
        digits.reverse();

        let padding = self.min_length.saturating_sub(1 + digits.len());
        let mut out = Vec::with_capacity(1 + padding + digits.len());
        out.push(lottery);
        out.extend(std::iter::repeat_n(alphabet[0], padding));
        out.extend(digits);
        String::from_utf8(out).unwrap_or_default()
    }

    /// Decode a hashid back to its primary key. Returns `None` for anything
    /// that is not the canonical encoding of some key.
    #[must_use]
    pub fn decode(&self, hash: &str) -> Option<i64> {
        let bytes = hash.as_bytes();
        if bytes.len() < 2 || !hash.is_ascii() {
            return None;
        }
        let lottery = bytes[0];
        if !self.alphabet.contains(&lottery) {
            return None;
        }
        let alphabet = self.round_alphabet(lottery);
        let base = alphabet.len() as u64;

        let mut value: u64 = 0;
        for byte in &bytes[1..] {
            let digit = alphabet.iter().position(|c| c == byte)? as u64;
            value = value.checked_mul(base)?.checked_add(digit)?;
        }

        let id = i64::try_from(value).ok()?;
        (self.encode(id) == hash).then_some(id)
    }

    fn round_alphabet(&self, lottery: u8) -> Vec<u8> {
        let mut salt = Vec::with_capacity(1 + self.salt.len());
        salt.push(lottery);
        salt.extend_from_slice(&self.salt);
        let mut alphabet = self.alphabet.clone();
        consistent_shuffle(&mut alphabet, &salt);
        alphabet
    }
}

fn digit_index(value: u64, base: u64) -> usize {
    usize::try_from(value % base).unwrap_or(0)
}

/// Deterministic salt-driven permutation (the hashids shuffle).
fn consistent_shuffle(alphabet: &mut [u8], salt: &[u8]) {
    if salt.is_empty() || alphabet.len() < 2 {
        return;
    }
    let mut v = 0usize;
    let mut p = 0usize;
    for i in (1..alphabet.len()).rev() {
        v %= salt.len();
        let ch = usize::from(salt[v]);
        p += ch;
        let j = (ch + v + p) % i;
        alphabet.swap(i, j);
        v += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn codec() -> HashidCodec {
        HashidCodec::new("revu test salt", 6)
    }

    #[test]
    fn encode_decode_sequential_keys() {
        let codec = codec();
        for id in 1..2_000 {
            let hash = codec.encode(id);
            assert_eq!(codec.decode(&hash), Some(id), "hash {hash} for id {id}");
        }
    }

    #[test]
    fn encoding_respects_min_length() {
        let codec = codec();
        assert_eq!(codec.encode(1).len(), 6);
        assert!(codec.encode(i64::MAX).len() > 6);
    }

    #[test]
    fn hashes_do_not_reveal_sequence() {
        let codec = codec();
        let hashes: Vec<String> = (40..44).map(|id| codec.encode(id)).collect();
        let mut sorted = hashes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), hashes.len());
    }

    #[test]
    fn different_salts_produce_different_hashes() {
        let a = HashidCodec::new("one", 0);
        let b = HashidCodec::new("two", 0);
        assert_ne!(a.encode(1234), b.encode(1234));
        assert_eq!(b.decode(&a.encode(1234)).filter(|id| *id == 1234), None);
    }

    #[test]
    fn decode_rejects_garbage() {
        let codec = codec();
        assert_eq!(codec.decode(""), None);
        assert_eq!(codec.decode("0"), None);
        assert_eq!(codec.decode("héllo!"), None);
        assert_eq!(codec.decode("!!!!!!"), None);
    }

    #[test]
    fn decode_rejects_non_canonical_padding() {
        let codec = codec();
        // 7 needs padding, so hash[1] is the zero digit
        let hash = codec.encode(7);
        let mut longer = hash.clone();
        longer.insert(1, hash.as_bytes()[1] as char);
        assert_eq!(codec.decode(&longer), None);
    }

    #[test]
    fn decode_rejects_overflow() {
        let codec = HashidCodec::new("", 0);
        let huge = "a".to_string() + &"9".repeat(40);
        assert_eq!(codec.decode(&huge), None);
    }

    #[test]
    fn custom_alphabet_validation() {
        assert!(HashidCodec::with_alphabet("abc", "", 0).is_err());
        assert!(HashidCodec::with_alphabet("aabcdefghijklmnopq", "", 0).is_err());
        assert!(HashidCodec::with_alphabet("abcdefgh ijklmnopq", "", 0).is_err());
        let codec = HashidCodec::with_alphabet("0123456789abcdef", "salt", 4).unwrap();
        let hash = codec.encode(99);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(codec.decode(&hash), Some(99));
    }
}
