// src/services/normalize.rs

//! Canonical forms for names, titles and ISBNs.

use crate::error::{AppError, Result};

/// Words kept lower-case in titles unless they open the title.
const MINOR_WORDS: [&str; 18] = [
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "into", "nor", "of", "on",
    "or", "the", "to", "with",
];

/// Upper-case the first character, leave the rest alone.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Normalize a person or organization name.
///
/// Trims, collapses whitespace runs and capitalizes each word. Interior
/// letters keep their case, so "McDonald" stays "McDonald".
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title-case a book title.
///
/// The text is lower-cased first. Words in [`MINOR_WORDS`] stay lower-case
/// except as the first word.
pub fn to_title_case(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split(' ')
        .enumerate()
        .map(|(index, word)| {
            if index == 0 || !MINOR_WORDS.contains(&word) {
                capitalize(word)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reduce an ISBN to its numeric value.
///
/// Everything but digits and `X` is stripped. The rest must be 10 or 13
/// characters long and numeric.
pub fn normalize_isbn(input: &str) -> Result<u64> {
    let clean: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || c.eq_ignore_ascii_case(&'x'))
        .collect();

    if clean.len() != 10 && clean.len() != 13 {
        return Err(AppError::invalid_format(format!(
            "Invalid ISBN length: expected 10 or 13 characters, got {}",
            clean.len()
        )));
    }

    clean.parse().map_err(|_| {
        AppError::invalid_format(format!("ISBN {clean} has an X check digit and is not numeric"))
    })
}

/// Split a comma-separated list of names, normalizing each and dropping blanks.
pub fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(normalize_name)
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_capitalized() {
        assert_eq!(normalize_name("  jane   doe "), "Jane Doe");
        assert_eq!(normalize_name("ursula k. le guin"), "Ursula K. Le Guin");
        assert_eq!(normalize_name("mcDonald"), "McDonald");
        assert_eq!(normalize_name("\tpenguin\nbooks"), "Penguin Books");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn title_case_keeps_minor_words_low() {
        assert_eq!(to_title_case("the lord of the rings"), "The Lord of the Rings");
        assert_eq!(to_title_case("a tale of two cities"), "A Tale of Two Cities");
        assert_eq!(
            to_title_case("HARRY POTTER AND THE GOBLET OF FIRE"),
            "Harry Potter and the Goblet of Fire"
        );
    }

    #[test]
    fn title_case_does_not_special_case_last_word() {
        assert_eq!(to_title_case("what dreams are made of"), "What Dreams Are Made of");
    }

    #[test]
    fn title_case_of_empty_text() {
        assert_eq!(to_title_case(""), "");
        assert_eq!(to_title_case("  dune  "), "Dune");
    }

    #[test]
    fn isbn_is_stripped_to_digits() {
        assert_eq!(normalize_isbn("978-0-13-468599-1").unwrap(), 9780134685991);
        assert_eq!(normalize_isbn("ISBN 0-441-01359-7").unwrap(), 441013597);
    }

    #[test]
    fn isbn_with_wrong_length_is_rejected() {
        assert!(matches!(normalize_isbn("123"), Err(AppError::InvalidFormat(_))));
        assert!(matches!(normalize_isbn(""), Err(AppError::InvalidFormat(_))));
        assert!(matches!(
            normalize_isbn("978-0-13-468599-12"),
            Err(AppError::InvalidFormat(_))
        ));
    }

    #[test]
    fn isbn_with_check_letter_is_not_numeric() {
        assert!(matches!(normalize_isbn("0-8044-2957-X"), Err(AppError::InvalidFormat(_))));
    }

    #[test]
    fn names_are_split_on_commas() {
        assert_eq!(
            split_names("frank herbert, , brian  herbert,"),
            vec!["Frank Herbert".to_string(), "Brian Herbert".to_string()]
        );
        assert!(split_names("").is_empty());
    }
}
