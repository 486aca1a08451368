use crate::domain::models::{ContactInfo, SyncReceipt, SyncSettings};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Duration;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern")
});

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ContactError {
    #[error("Name must be at least 2 characters")]
    NameTooShort,
    #[error("Name must be less than 100 characters")]
    NameTooLong,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Email must be less than 255 characters")]
    EmailTooLong,
    #[error("Please enter a valid phone number")]
    PhoneTooShort,
    #[error("Phone number is too long")]
    PhoneTooLong,
    #[error("name, email and phone must be given together")]
    Incomplete,
}

#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    #[error("contact sync is not configured (set [sync].endpoint)")]
    NotConfigured,
    #[error("contact sync to {endpoint} failed: {message}")]
    Failed { endpoint: String, message: String },
}

pub fn validate_name(raw: &str) -> Result<String, ContactError> {
    let name = raw.trim();
    match name.chars().count() {
        n if n < 2 => Err(ContactError::NameTooShort),
        n if n > 100 => Err(ContactError::NameTooLong),
        _ => Ok(name.to_string()),
    }
}

pub fn validate_email(raw: &str) -> Result<String, ContactError> {
    let email = raw.trim();
    if !EMAIL.is_match(email) {
        return Err(ContactError::InvalidEmail);
    }
    if email.chars().count() > 255 {
        return Err(ContactError::EmailTooLong);
    }
    Ok(email.to_string())
}

pub fn validate_phone(raw: &str) -> Result<String, ContactError> {
    let phone = raw.trim();
    match phone.chars().count() {
        n if n < 10 => Err(ContactError::PhoneTooShort),
        n if n > 20 => Err(ContactError::PhoneTooLong),
        _ => Ok(phone.to_string()),
    }
}

impl ContactInfo {
    /// Trimmed, validated copy of the contact details.
    pub fn validated(&self) -> Result<ContactInfo, ContactError> {
        Ok(ContactInfo {
            name: validate_name(&self.name)?,
            email: validate_email(&self.email)?,
            phone: validate_phone(&self.phone)?,
        })
    }
}

/// Builds a validated contact from optional parts; all absent means no contact.
pub fn contact_from_parts(
    name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<Option<ContactInfo>, ContactError> {
    match (name, email, phone) {
        (None, None, None) => Ok(None),
        (Some(name), Some(email), Some(phone)) => Ok(Some(ContactInfo {
            name: validate_name(name)?,
            email: validate_email(email)?,
            phone: validate_phone(phone)?,
        })),
        _ => Err(ContactError::Incomplete),
    }
}

#[derive(Serialize)]
pub struct ContactSyncPayload<'a> {
    pub source: &'a str,
    pub contact: &'a ContactInfo,
    pub matched_results: Vec<String>,
    pub answered: usize,
    pub catalog_digest: String,
}

pub fn sync_contact(
    settings: &SyncSettings,
    payload: &ContactSyncPayload<'_>,
) -> Result<SyncReceipt, SyncError> {
    let endpoint = settings
        .endpoint
        .as_deref()
        .ok_or(SyncError::NotConfigured)?;
    let failed = |message: String| SyncError::Failed {
        endpoint: endpoint.to_string(),
        message,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(settings.timeout_ms))
        .build()
        .map_err(|e| failed(e.to_string()))?;
    let mut req = client.post(endpoint).json(payload);
    if let Ok(token) = std::env::var(&settings.token_env) {
        if !token.trim().is_empty() {
            req = req.bearer_auth(token.trim());
        }
    }
    let resp = req.send().map_err(|e| failed(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(failed(format!("server responded {}", status)));
    }
    tracing::info!(endpoint, status = status.as_u16(), "contact synced");
    Ok(SyncReceipt {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
    })
}
