use serde::{Deserialize, Serialize};

// ============================================================================
// Domain Models
// ============================================================================

/// A stored customer record
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub mobile_number: String,
}

/// The writable fields of a customer, already validated
#[derive(Clone, Debug, PartialEq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub mobile_number: String,
}

impl CustomerDetails {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        mobile_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            mobile_number: mobile_number.into(),
        }
    }

    pub fn into_customer(self, id: i32) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
            mobile_number: self.mobile_number,
        }
    }
}

// ============================================================================
// Request Payload
// ============================================================================
//
// Every field is optional at the serde level so a missing field is reported
// as a validation message instead of a deserialization error.
//
// ============================================================================

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name is required")]
    MissingName,

    #[error("Email is required")]
    MissingEmail,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Mobile number is required")]
    MissingMobileNumber,

    #[error("Invalid mobile number: {0}")]
    InvalidMobileNumber(String),

    #[error("Customer id is required for update")]
    MissingId,
}

impl CustomerRequest {
    /// Validate the payload, returning the optional id and the trimmed fields
    pub fn validate(self) -> Result<(Option<i32>, CustomerDetails), ValidationError> {
        let name = required(self.name).ok_or(ValidationError::MissingName)?;
        let email = required(self.email).ok_or(ValidationError::MissingEmail)?;
        let mobile_number =
            required(self.mobile_number).ok_or(ValidationError::MissingMobileNumber)?;

        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }
        if !is_valid_mobile(&mobile_number) {
            return Err(ValidationError::InvalidMobileNumber(mobile_number));
        }

        Ok((self.id, CustomerDetails::new(name, email, mobile_number)))
    }

    /// Validate a payload that must identify an existing record
    pub fn validate_with_id(self) -> Result<(i32, CustomerDetails), ValidationError> {
        let (id, details) = self.validate()?;
        let id = id.ok_or(ValidationError::MissingId)?;
        Ok((id, details))
    }
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

fn is_valid_mobile(mobile: &str) -> bool {
    let digits = mobile.strip_prefix('+').unwrap_or(mobile);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
