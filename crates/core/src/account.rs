//! Profile records for people signed in through the identity provider.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{AccountType, Email, SubscriptionStatus, VerificationStatus};

/// A profile field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    Email,
    PhoneNumber,
    Address,
}

/// One problem with a submitted profile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("Name is required")]
    NameRequired,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Phone number is required")]
    PhoneRequired,
    #[error("Address is required")]
    AddressRequired,
}

impl ProfileError {
    #[must_use]
    pub const fn field(&self) -> ProfileField {
        match self {
            Self::NameRequired => ProfileField::Name,
            Self::InvalidEmail => ProfileField::Email,
            Self::PhoneRequired => ProfileField::PhoneNumber,
            Self::AddressRequired => ProfileField::Address,
        }
    }
}

/// Every problem found on a profile form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileErrors(pub Vec<ProfileError>);

impl fmt::Display for ProfileErrors {
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

impl std::error::Error for ProfileErrors {}

/// Sign-up form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub account_type: AccountType,
}

/// A user row ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub account_type: AccountType,
    pub subscription_status: SubscriptionStatus,
    pub verification_status: VerificationStatus,
}

impl Registration {
    /// Validate the form and fill in the starting statuses.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileErrors`] for a blank name or an invalid email.
    pub fn validate(&self) -> Result<NewUser, ProfileErrors> {
        let mut errors = Vec::new();
        let name = required(&self.name, ProfileError::NameRequired, &mut errors);
        let email = Email::parse(&self.email)
            .map_err(|_| errors.push(ProfileError::InvalidEmail))
            .ok();

        match (name, email) {
            (Some(name), Some(email)) => Ok(NewUser {
                name,
                email,
                account_type: self.account_type,
                subscription_status: self.account_type.initial_subscription_status(),
                verification_status: VerificationStatus::Unverified,
            }),
            _ => Err(ProfileErrors(errors)),
        }
    }
}

/// Profile form on the account page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
}

/// Profile values that passed validation, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProfile {
    pub name: String,
    pub email: Email,
    pub phone_number: String,
    pub address: String,
}

impl ProfileUpdate {
    /// # Errors
    ///
    /// Returns [`ProfileErrors`] with one entry per failing field.
    pub fn validate(&self) -> Result<ValidProfile, ProfileErrors> {
        let mut errors = Vec::new();
        let name = required(&self.name, ProfileError::NameRequired, &mut errors);
        let email = Email::parse(&self.email)
            .map_err(|_| errors.push(ProfileError::InvalidEmail))
            .ok();
        let phone_number = required(&self.phone_number, ProfileError::PhoneRequired, &mut errors);
        let address = required(&self.address, ProfileError::AddressRequired, &mut errors);

        match (name, email, phone_number, address) {
            (Some(name), Some(email), Some(phone_number), Some(address)) => Ok(ValidProfile {
                name,
                email,
                phone_number,
                address,
            }),
            _ => Err(ProfileErrors(errors)),
        }
    }
}

fn required(raw: &str, missing: ProfileError, errors: &mut Vec<ProfileError>) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(missing);
        None
    } else {
        Some(trimmed.to_owned())
    }
}
