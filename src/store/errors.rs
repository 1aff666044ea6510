// ============================================================================
// Customer Store Errors
// ============================================================================

/// Which contact field(s) collided with another record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Email,
    MobileNumber,
    Both,
}

impl ContactField {
    /// Combine the two per-field collision flags; `None` when neither collided
    pub fn from_flags(email: bool, mobile_number: bool) -> Option<Self> {
        match (email, mobile_number) {
            (true, true) => Some(ContactField::Both),
            (true, false) => Some(ContactField::Email),
            (false, true) => Some(ContactField::MobileNumber),
            (false, false) => None,
        }
    }
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactField::Email => write!(f, "Email already exists"),
            ContactField::MobileNumber => write!(f, "Mobile number already exists"),
            ContactField::Both => write!(f, "Email and mobile number already exist"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    DuplicateContact(ContactField),

    #[error("Customer not found with id: {0}")]
    NotFound(i32),

    #[error("Internal server error")]
    StorageFault(#[from] sqlx::Error),

    #[error("Internal server error")]
    IdsExhausted,
}

impl StoreError {
    /// Short label used for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::DuplicateContact(_) => "duplicate_contact",
            StoreError::NotFound(_) => "not_found",
            StoreError::StorageFault(_) => "storage_fault",
            StoreError::IdsExhausted => "ids_exhausted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_field_from_flags() {
        assert_eq!(ContactField::from_flags(true, true), Some(ContactField::Both));
        assert_eq!(ContactField::from_flags(true, false), Some(ContactField::Email));
        assert_eq!(
            ContactField::from_flags(false, true),
            Some(ContactField::MobileNumber)
        );
        assert_eq!(ContactField::from_flags(false, false), None);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StoreError::DuplicateContact(ContactField::Email).to_string(),
            "Email already exists"
        );
        assert_eq!(
            StoreError::DuplicateContact(ContactField::Both).to_string(),
            "Email and mobile number already exist"
        );
        assert_eq!(
            StoreError::NotFound(42).to_string(),
            "Customer not found with id: 42"
        );
        // Storage details never reach the message
        let fault = StoreError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(fault.to_string(), "Internal server error");
        assert_eq!(fault.kind(), "storage_fault");
        assert_eq!(StoreError::IdsExhausted.to_string(), "Internal server error");
    }
}
