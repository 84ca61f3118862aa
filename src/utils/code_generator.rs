//! Short code generation.
//!
//! Codes are six symbols drawn uniformly from `[A-Za-z0-9]`, giving
//! 62^6 (about 56.8 billion) possible values. The random source is injected
//! so tests can seed it and get a reproducible sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Number of symbols in a generated short code.
pub const CODE_LENGTH: usize = 6;

/// Symbols a generated code is drawn from.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Codes that collide with fixed top-level routes and are never issued.
pub const RESERVED_CODES: &[&str] = &["health"];

/// Returns true if `code` shadows a fixed route.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Calls `draw` until it yields a code outside [`RESERVED_CODES`].
fn first_unreserved(mut draw: impl FnMut() -> String) -> String {
    loop {
        let code = draw();
        if !is_reserved_code(&code) {
            return code;
        }
    }
}

/// Draws one short code from `rng`.
///
/// # Examples
///
/// ```ignore
/// let mut rng = StdRng::seed_from_u64(7);
/// let code = generate_code(&mut rng);
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `code` has the shape of a generated code.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Thread-safe short code source owning its random number generator.
///
/// Generation does not consult storage. Uniqueness is the caller's concern
/// and is settled by the store's constraint on insert.
pub struct CodeGenerator {
    rng: Mutex<StdRng>,
}

impl CodeGenerator {
    /// Wraps an existing generator.
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Generator seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Deterministic generator; the same seed yields the same code sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Produces the next code, skipping [`RESERVED_CODES`].
    pub fn generate(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        first_unreserved(|| generate_code(&mut *rng))
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        let code = CodeGenerator::from_os_rng().generate();
        assert_eq!(code.len(), CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_alphanumeric_only() {
        let generator = CodeGenerator::seeded(1);
        for _ in 0..500 {
            let code = generator.generate();
            assert!(
                code.chars().all(|c| c.is_ascii_alphanumeric()),
                "unexpected symbol in {code}"
            );
        }
    }

    #[test]
    fn test_seeded_generators_are_reproducible() {
        let a = CodeGenerator::seeded(42);
        let b = CodeGenerator::seeded(42);

        for _ in 0..20 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a = CodeGenerator::seeded(1);
        let b = CodeGenerator::seeded(2);
        let a: Vec<String> = (0..5).map(|_| a.generate()).collect();
        let b: Vec<String> = (0..5).map(|_| b.generate()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let generator = CodeGenerator::seeded(7);
        let codes: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_generate_code_covers_alphabet_classes() {
        let generator = CodeGenerator::seeded(99);
        let joined: String = (0..200).map(|_| generator.generate()).collect();

        assert!(joined.chars().any(|c| c.is_ascii_uppercase()));
        assert!(joined.chars().any(|c| c.is_ascii_lowercase()));
        assert!(joined.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_code_with_borrowed_rng() {
        let mut rng = StdRng::seed_from_u64(5);
        let code = generate_code(&mut rng);
        assert!(is_valid_code(&code));
    }

    #[test]
    fn test_reserved_codes_are_skipped() {
        let mut draws = vec!["abc123", "health"];
        let code = first_unreserved(|| draws.pop().unwrap().to_string());

        assert_eq!(code, "abc123");
        assert!(draws.is_empty());
    }

    #[test]
    fn test_is_reserved_code() {
        assert!(is_reserved_code("health"));
        assert!(!is_reserved_code("Health"));
        assert!(!is_reserved_code("abc123"));
    }

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("abc123"));
        assert!(is_valid_code("ZZZZZZ"));
        assert!(!is_valid_code("abc12"));
        assert!(!is_valid_code("abc1234"));
        assert!(!is_valid_code("abc-12"));
        assert!(!is_valid_code(""));
    }
}
