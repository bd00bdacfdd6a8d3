use crate::models::Country;

pub fn strip_non_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

pub fn digit_count(input: &str) -> usize {
    input.chars().filter(char::is_ascii_digit).count()
}

/// Formats whatever the user typed into the country's display mask.
///
/// Separators already present in `input` are dropped before the mask is
/// rebuilt, so masking a masked value returns it unchanged. Output stops at
/// the last typed digit; literals after it are not emitted.
pub fn mask_phone(input: &str, country: Country) -> String {
    let format = country.phone_format();
    let mut digits = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(format.max_digits)
        .peekable();

    let mut masked = String::with_capacity(format.mask.len());
    for slot in format.mask.chars() {
        if digits.peek().is_none() {
            break;
        }
        if slot == '#' {
            if let Some(d) = digits.next() {
                masked.push(d);
            }
        } else {
            masked.push(slot);
        }
    }
    masked
}

/// A phone is complete only when it has exactly the country's digit count.
pub fn is_complete(phone: &str, country: Country) -> bool {
    digit_count(phone) == country.max_digits()
}

/// Display form used in submissions: `"+55 (11) 99999-8888"`.
pub fn with_dial_code(phone: &str, country: Country) -> String {
    format!("{} {}", country.dial_code(), mask_phone(phone, country))
}
