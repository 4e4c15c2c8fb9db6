use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const DEFAULT_CODE_LENGTH: usize = 6;
pub const MAX_CODE_LENGTH: usize = 16;

const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Display, From, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Code(pub String);

impl Code {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// First candidate code for `url`: the leading `size` bytes of
    /// SHA-256(url), each mapped through `ALPHABET[byte % 62]`.
    pub fn generate(url: &str, size: usize) -> Self {
        Self::generate_salted(url, size, 0)
    }

    /// Candidate for retry `attempt`. Attempt 0 is the plain hash of the url,
    /// later attempts append the big-endian counter before hashing.
    pub fn generate_salted(url: &str, size: usize, attempt: u32) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        if attempt > 0 {
            hasher.update(attempt.to_be_bytes());
        }
        let digest = hasher.finalize();

        // a digest only has 32 bytes to hand out
        let size = size.clamp(1, digest.len());
        let code = digest[..size]
            .iter()
            .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
            .collect();
        Self(code)
    }

    /// Whether `s` could ever have been issued as a code.
    pub fn is_well_formed(s: &str) -> bool {
        !s.is_empty() && s.len() <= MAX_CODE_LENGTH && s.bytes().all(|b| b.is_ascii_alphanumeric())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_generate() {
        let c1 = Code::generate("https://example.com/a", DEFAULT_CODE_LENGTH);
        let c2 = Code::generate("https://example.com/a", DEFAULT_CODE_LENGTH);
        let c3 = Code::generate("https://example.com/b", DEFAULT_CODE_LENGTH);

        assert_eq!(c1, c2);
        assert_ne!(c1, c3);
        assert_eq!(c1.as_str(), "Tukosg");
        assert_eq!(c3.as_str(), "DgypXY");
    }

    #[test]
    fn test_code_length_and_alphabet() {
        let code = Code::generate("https://example.com/a", 8);
        assert_eq!(code.as_str(), "TukosgBe");
        assert!(code.as_str().bytes().all(|b| b.is_ascii_alphanumeric()));

        assert_eq!(Code::generate("https://example.com/a", 100).as_str().len(), 32);
    }

    #[test]
    fn test_code_generate_salted() {
        let url = "https://example.com/a";
        assert_eq!(Code::generate_salted(url, 6, 0), Code::generate(url, 6));
        assert_eq!(Code::generate_salted(url, 6, 1).as_str(), "s26yUf");
        assert_eq!(Code::generate_salted(url, 6, 2).as_str(), "ACF6VA");
    }

    #[test]
    fn test_code_alphabet_is_lowercase_first() {
        assert_eq!(ALPHABET[0], b'a');
        assert_eq!(ALPHABET[26], b'A');
        assert_eq!(ALPHABET[52], b'0');
        assert_eq!(Code::generate("https://example.com/a", 8).as_str(), "TukosgBe");
    }

    #[test]
    fn test_code_is_well_formed() {
        assert!(Code::is_well_formed("Tukosg"));
        assert!(!Code::is_well_formed(""));
        assert!(!Code::is_well_formed("abc-12"));
        assert!(!Code::is_well_formed("a".repeat(MAX_CODE_LENGTH + 1).as_str()));
    }
}
