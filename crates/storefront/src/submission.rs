//! Order hand-off.
//!
//! Orders are not placed through the site. The formatted order summary is
//! handed to a [`SubmissionChannel`], which turns it into a link the customer
//! opens to send the order themselves (e.g., a `WhatsApp` chat prefilled with
//! the summary). No response is consumed.

use thiserror::Error;
use url::Url;

/// Base URL for `WhatsApp` click-to-chat links.
const WHATSAPP_BASE_URL: &str = "https://wa.me/";

/// Errors building a submission link.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
    #[error("invalid submission URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Destination for a formatted order summary.
pub trait SubmissionChannel {
    /// Build the external link that carries `summary`.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` if the link cannot be built.
    fn open(&self, summary: &str) -> Result<Url, SubmissionError>;
}

/// `WhatsApp` click-to-chat channel.
///
/// Without a phone number the link opens the contact picker with the
/// message prefilled.
#[derive(Debug, Clone, Default)]
pub struct WhatsAppChannel {
    phone: Option<String>,
}

impl WhatsAppChannel {
    /// Create a channel addressed to `phone`.
    ///
    /// Spaces, dashes, parentheses, and a leading `+` are stripped.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::InvalidPhone` if anything other than digits
    /// remains, or if no digits remain.
    pub fn new(phone: &str) -> Result<Self, SubmissionError> {
        let digits: String = phone
            .trim()
            .trim_start_matches('+')
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(SubmissionError::InvalidPhone(phone.to_string()));
        }

        Ok(Self {
            phone: Some(digits),
        })
    }

    /// Create a channel with no fixed recipient.
    #[must_use]
    pub const fn unaddressed() -> Self {
        Self { phone: None }
    }

    /// Recipient phone number, digits only.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

impl SubmissionChannel for WhatsAppChannel {
    fn open(&self, summary: &str) -> Result<Url, SubmissionError> {
        let link = format!(
            "{WHATSAPP_BASE_URL}{}?text={}",
            self.phone.as_deref().unwrap_or_default(),
            urlencoding::encode(summary)
        );
        Ok(Url::parse(&link)?)
    }
}
