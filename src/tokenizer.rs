//! Fragment normalization and tokenization
//!
//! OCR lines like `"Azithromycin 500mg (Tablets)"` are split into candidate
//! words before fuzzy comparison. Splitting happens on runs of whitespace and
//! on the literal delimiters `-`, `(` and `)`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DELIMITERS: Regex = Regex::new(r"[\s\-()]+").unwrap();
}

/// Case-fold and trim a raw string into dictionary key form.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Split a fragment into non-empty candidate words, left to right.
pub fn tokenize(fragment: &str) -> Vec<&str> {
    DELIMITERS
        .split(fragment)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Length of a token in characters, the unit the minimum-length filter uses.
pub fn char_len(token: &str) -> usize {
    token.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Paracetamol \n"), "paracetamol");
        assert_eq!(normalize("IBUPROFEN"), "ibuprofen");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_tokenize_delimiters() {
        assert_eq!(
            tokenize("azithromycin 500mg (tablets)"),
            vec!["azithromycin", "500mg", "tablets"]
        );
        assert_eq!(tokenize("co-amoxiclav"), vec!["co", "amoxiclav"]);
    }

    #[test]
    fn test_tokenize_drops_empty_tokens() {
        assert_eq!(tokenize("--(( a ))--"), vec!["a"]);
        assert_eq!(tokenize("  dosage\t\ttake   one "), vec!["dosage", "take", "one"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize(" -() ").is_empty());
    }

    #[test]
    fn test_other_punctuation_is_kept() {
        assert_eq!(tokenize("batch no. 12345"), vec!["batch", "no.", "12345"]);
        assert_eq!(tokenize("dosage: one"), vec!["dosage:", "one"]);
    }

    #[test]
    fn test_char_len_counts_scalars() {
        assert_eq!(char_len("mg"), 2);
        assert_eq!(char_len("éèà"), 3);
    }
}
