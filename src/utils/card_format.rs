const GROUP: usize = 4;
const MAX_DIGITS: usize = 16;

/// Display mask for the card-number input: digits only, grouped in fours.
///
/// Fewer than four digits are returned bare; anything past sixteen digits is
/// dropped. This is a presentation transform, not card validation.
#[must_use]
pub fn format_card_number(value: &str) -> String {
    let digits: Vec<char> = value.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < GROUP {
        return digits.into_iter().collect();
    }
    digits[..digits.len().min(MAX_DIGITS)]
        .chunks(GROUP)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Last four digits, for receipts and gateway requests.
#[must_use]
pub fn card_last_four(value: &str) -> String {
    let digits: Vec<char> = value.chars().filter(char::is_ascii_digit).collect();
    digits[digits.len().saturating_sub(GROUP)..].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits_in_fours() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("411111"), "4111 11");
    }

    #[test]
    fn formatted_input_is_unchanged() {
        let formatted = "4111 1111 1111 1111";
        assert_eq!(format_card_number(formatted), formatted);
        assert_eq!(format_card_number(&format_card_number("4111-1111-11")), "4111 1111 11");
    }

    #[test]
    fn strips_non_digits() {
        assert_eq!(format_card_number("4111-1111 abcd 1111"), "4111 1111 1111");
    }

    #[test]
    fn short_input_stays_bare() {
        assert_eq!(format_card_number("41a"), "41");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn truncates_after_sixteen_digits() {
        assert_eq!(
            format_card_number("41111111111111112222"),
            "4111 1111 1111 1111"
        );
    }

    #[test]
    fn last_four() {
        assert_eq!(card_last_four("4111 1111 1111 1234"), "1234");
        assert_eq!(card_last_four("12"), "12");
    }
}
