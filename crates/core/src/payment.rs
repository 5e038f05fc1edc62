//! Card details entered on the subscription form.
//!
//! Cards are only checked for shape here; nothing is charged. Every field is
//! checked and all problems are reported together. After validation only the
//! last four digits and the method name are kept.

use core::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Raw card fields from the subscription form.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CardInput {
    /// Digits, optionally grouped with spaces.
    pub card_number: String,
    /// `MM/YY`.
    pub expiry: String,
    pub cvc: String,
    pub cardholder_name: String,
}

// Keep card data out of logs
impl fmt::Debug for CardInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardInput")
            .field("card_number", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("cvc", &"[REDACTED]")
            .field("cardholder_name", &self.cardholder_name)
            .finish()
    }
}

/// The form field a [`CardError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardField {
    CardNumber,
    Expiry,
    Cvc,
    CardholderName,
}

/// One problem with the entered card.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    #[error("Card number is required")]
    NumberRequired,
    #[error("Card number must be between 13 and 19 digits")]
    NumberLength,
    #[error("Card number must contain only digits")]
    NumberNotDigits,
    #[error("Invalid card number")]
    NumberChecksum,
    #[error("Expiry date is required")]
    ExpiryRequired,
    #[error("Expiry date must be in MM/YY format")]
    ExpiryFormat,
    #[error("Invalid month")]
    ExpiryMonth,
    #[error("Card has expired")]
    Expired,
    #[error("CVC is required")]
    CvcRequired,
    #[error("CVC must be 3 or 4 digits")]
    CvcFormat,
    #[error("Cardholder name is required")]
    NameRequired,
}

impl CardError {
    #[must_use]
    pub const fn field(&self) -> CardField {
        match self {
            Self::NumberRequired
            | Self::NumberLength
            | Self::NumberNotDigits
            | Self::NumberChecksum => CardField::CardNumber,
            Self::ExpiryRequired | Self::ExpiryFormat | Self::ExpiryMonth | Self::Expired => {
                CardField::Expiry
            }
            Self::CvcRequired | Self::CvcFormat => CardField::Cvc,
            Self::NameRequired => CardField::CardholderName,
        }
    }
}

/// Every problem found on the form, at most one per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardErrors(pub Vec<CardError>);

impl CardErrors {
    /// Error for `field`, if any.
    #[must_use]
    pub fn get(&self, field: CardField) -> Option<&CardError> {
        self.0.iter().find(|e| e.field() == field)
    }
}

impl fmt::Display for CardErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CardErrors {}

/// What is stored about an accepted card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSummary {
    pub payment_method: &'static str,
    pub card_last4: String,
}

impl CardInput {
    /// Check every field as of `today`.
    ///
    /// # Errors
    ///
    /// Returns [`CardErrors`] listing each field that failed.
    pub fn validate(&self, today: NaiveDate) -> Result<CardSummary, CardErrors> {
        let number: String = self.card_number.split_whitespace().collect();

        let errors: Vec<CardError> = [
            check_number(&number).err(),
            check_expiry(&self.expiry, today).err(),
            check_cvc(&self.cvc).err(),
            self.cardholder_name
                .trim()
                .is_empty()
                .then_some(CardError::NameRequired),
        ]
        .into_iter()
        .flatten()
        .collect();

        if !errors.is_empty() {
            return Err(CardErrors(errors));
        }

        let split = number.len().saturating_sub(4);
        Ok(CardSummary {
            payment_method: "card",
            card_last4: number.get(split..).unwrap_or_default().to_owned(),
        })
    }
}

fn check_number(number: &str) -> Result<(), CardError> {
    if number.is_empty() {
        return Err(CardError::NumberRequired);
    }
    if !(13..=19).contains(&number.len()) {
        return Err(CardError::NumberLength);
    }
    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CardError::NumberNotDigits);
    }
    if !luhn(number) {
        return Err(CardError::NumberChecksum);
    }
    Ok(())
}

/// Luhn checksum over ASCII digits.
fn luhn(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn check_expiry(expiry: &str, today: NaiveDate) -> Result<(), CardError> {
    let expiry = expiry.trim();
    if expiry.is_empty() {
        return Err(CardError::ExpiryRequired);
    }
    let (month, year) = expiry
        .split_once('/')
        .filter(|(m, y)| is_two_digits(m) && is_two_digits(y))
        .ok_or(CardError::ExpiryFormat)?;

    let month: u32 = month.parse().map_err(|_| CardError::ExpiryFormat)?;
    let year: i32 = year.parse().map_err(|_| CardError::ExpiryFormat)?;
    let year = 2000 + year;

    if !(1..=12).contains(&month) {
        return Err(CardError::ExpiryMonth);
    }
    // Valid through the end of the printed month
    if (year, month) < (today.year(), today.month()) {
        return Err(CardError::Expired);
    }
    Ok(())
}

fn is_two_digits(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit())
}

fn check_cvc(cvc: &str) -> Result<(), CardError> {
    if cvc.is_empty() {
        return Err(CardError::CvcRequired);
    }
    if !(3..=4).contains(&cvc.len()) || !cvc.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CardError::CvcFormat);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // Standard test card numbers
    const VISA: &str = "4242 4242 4242 4242";
    const AMEX: &str = "378282246310005";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn card(number: &str, expiry: &str, cvc: &str, name: &str) -> CardInput {
        CardInput {
            card_number: number.to_owned(),
            expiry: expiry.to_owned(),
            cvc: cvc.to_owned(),
            cardholder_name: name.to_owned(),
        }
    }

    #[test]
    fn test_valid_card_keeps_last_four() {
        let summary = card(VISA, "12/28", "123", "Ada Glazier")
            .validate(today())
            .unwrap();
        assert_eq!(summary.card_last4, "4242");
        assert_eq!(summary.payment_method, "card");

        let summary = card(AMEX, "03/26", "1234", "Ada Glazier")
            .validate(today())
            .unwrap();
        assert_eq!(summary.card_last4, "0005");
    }

    #[test]
    fn test_luhn() {
        assert!(luhn("4242424242424242"));
        assert!(luhn(AMEX));
        assert!(!luhn("4242424242424241"));
    }

    #[test]
    fn test_number_errors() {
        let cases = [
            ("", CardError::NumberRequired),
            ("4242 4242", CardError::NumberLength),
            ("4242-4242-4242-4242", CardError::NumberNotDigits),
            ("4242 4242 4242 4242 4242", CardError::NumberLength),
            ("4242x42424242424", CardError::NumberNotDigits),
            ("4242 4242 4242 4241", CardError::NumberChecksum),
        ];
        for (number, expected) in cases {
            let errors = card(number, "12/28", "123", "Ada")
                .validate(today())
                .unwrap_err();
            assert_eq!(errors.0, vec![expected], "{number}");
        }
    }

    #[test]
    fn test_expiry_errors() {
        let cases = [
            ("", CardError::ExpiryRequired),
            ("1228", CardError::ExpiryFormat),
            ("1/28", CardError::ExpiryFormat),
            ("12/2028", CardError::ExpiryFormat),
            ("13/28", CardError::ExpiryMonth),
            ("00/28", CardError::ExpiryMonth),
            ("02/26", CardError::Expired),
            ("12/25", CardError::Expired),
        ];
        for (expiry, expected) in cases {
            let errors = card(VISA, expiry, "123", "Ada")
                .validate(today())
                .unwrap_err();
            assert_eq!(errors.0, vec![expected], "{expiry}");
        }
    }

    #[test]
    fn test_current_month_is_still_valid() {
        assert!(card(VISA, "03/26", "123", "Ada").validate(today()).is_ok());
    }

    #[test]
    fn test_cvc_errors() {
        for (cvc, expected) in [
            ("", CardError::CvcRequired),
            ("12", CardError::CvcFormat),
            ("12345", CardError::CvcFormat),
            ("12a", CardError::CvcFormat),
        ] {
            let errors = card(VISA, "12/28", cvc, "Ada")
                .validate(today())
                .unwrap_err();
            assert_eq!(errors.0, vec![expected], "{cvc}");
        }
    }

    #[test]
    fn test_reports_every_field() {
        let errors = CardInput::default().validate(today()).unwrap_err();
        assert_eq!(errors.0.len(), 4);
        assert_eq!(errors.get(CardField::Cvc), Some(&CardError::CvcRequired));
        assert_eq!(
            errors.get(CardField::CardholderName),
            Some(&CardError::NameRequired)
        );
        assert_eq!(
            errors.to_string(),
            "Card number is required; Expiry date is required; CVC is required; \
             Cardholder name is required"
        );
    }

    #[test]
    fn test_debug_redacts_number() {
        let debug = format!("{:?}", card(VISA, "12/28", "123", "Ada"));
        assert!(!debug.contains("4242"));
        assert!(!debug.contains("123"));
    }
}
