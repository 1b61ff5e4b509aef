//! Gender derivation from the national ID sequence digit.

/// Derive gender from the 17th character (0-indexed position 16) of an
/// 18-character national ID: odd digit = male (1), even digit = female (2).
///
/// The caller validates the ID format first; the digit is guaranteed by the
/// `^\d{17}[\dXx]$` pattern.
pub fn derive_gender(id_number: &str) -> i32 {
    let digit = id_number
        .chars()
        .nth(16)
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0);
    if digit % 2 == 1 {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_sequence_digit_is_male() {
        assert_eq!(derive_gender("110101199003070011"), 1);
        assert_eq!(derive_gender("110101199003070031"), 1);
        assert_eq!(derive_gender("110101199003070051"), 1);
        assert_eq!(derive_gender("110101199003070071"), 1);
        assert_eq!(derive_gender("11010119900307009X"), 1);
    }

    #[test]
    fn even_sequence_digit_is_female() {
        assert_eq!(derive_gender("110101199003070001"), 2);
        assert_eq!(derive_gender("110101199003070021"), 2);
        assert_eq!(derive_gender("110101199003070041"), 2);
        assert_eq!(derive_gender("110101199003070061"), 2);
        assert_eq!(derive_gender("110101199003070081"), 2);
    }

    #[test]
    fn checksum_character_is_ignored() {
        // Only position 16 matters; the final checksum may be X
        assert_eq!(derive_gender("11010119900307001X"), 1);
        assert_eq!(derive_gender("11010119900307002X"), 2);
    }
}
