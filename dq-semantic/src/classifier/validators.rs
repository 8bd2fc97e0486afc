//! Checksum validators that refine regex matches.

/// A programmatic check applied after a category's pattern matched.
pub trait SemanticValidator: Send + Sync + std::fmt::Debug {
    /// Returns true when the value passes the check.
    fn is_valid(&self, value: &str) -> bool;

    /// Name under which the validator is registered.
    fn name(&self) -> &'static str;
}

/// Looks up a validator by its registered name (case-insensitive).
pub fn validator_by_name(name: &str) -> Option<Box<dyn SemanticValidator>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "sedol" => Some(Box::new(SedolValidator)),
        "luhn" => Some(Box::new(LuhnValidator)),
        "iban" => Some(Box::new(IbanValidator)),
        _ => None,
    }
}

/// SEDOL check digit (weights 1, 3, 1, 7, 3, 9; base-36 characters).
#[derive(Debug, Clone, Copy, Default)]
pub struct SedolValidator;

impl SedolValidator {
    const WEIGHTS: [u32; 6] = [1, 3, 1, 7, 3, 9];

    /// Computes the check digit for the first six characters.
    pub fn check_digit(body: &str) -> Option<u32> {
        let mut total = 0;
        let mut chars = body.chars();
        for weight in Self::WEIGHTS {
            let digit = chars.next()?.to_digit(36)?;
            total += digit * weight;
        }
        Some((10 - total % 10) % 10)
    }
}

impl SemanticValidator for SedolValidator {
    fn is_valid(&self, value: &str) -> bool {
        if value.chars().count() != 7 || !value.is_ascii() {
            return false;
        }
        let (body, check) = value.split_at(6);
        match (check.chars().next().and_then(|c| c.to_digit(10)), Self::check_digit(body)) {
            (Some(check), Some(expected)) => check == expected,
            _ => false,
        }
    }

    fn name(&self) -> &'static str {
        "sedol"
    }
}

/// Luhn (mod 10) checksum over the digits of a value; separators are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct LuhnValidator;

impl SemanticValidator for LuhnValidator {
    fn is_valid(&self, value: &str) -> bool {
        let mut sum = 0;
        let mut count = 0;
        for c in value.chars().rev() {
            if c == ' ' || c == '-' {
                continue;
            }
            let Some(mut digit) = c.to_digit(10) else {
                return false;
            };
            if count % 2 == 1 {
                digit *= 2;
                if digit > 9 {
                    digit -= 9;
                }
            }
            sum += digit;
            count += 1;
        }
        count >= 2 && sum % 10 == 0
    }

    fn name(&self) -> &'static str {
        "luhn"
    }
}

/// IBAN mod-97 check; spaces are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct IbanValidator;

impl SemanticValidator for IbanValidator {
    fn is_valid(&self, value: &str) -> bool {
        let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.len() < 15 || compact.len() > 34 || !compact.is_ascii() {
            return false;
        }
        let (head, tail) = compact.split_at(4);
        let mut remainder: u32 = 0;
        for c in tail.chars().chain(head.chars()) {
            let Some(digit) = c.to_digit(36) else {
                return false;
            };
            remainder = if digit < 10 {
                (remainder * 10 + digit) % 97
            } else {
                (remainder * 100 + digit) % 97
            };
        }
        remainder == 1
    }

    fn name(&self) -> &'static str {
        "iban"
    }
}
