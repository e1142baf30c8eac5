use regex::Regex;
use serde::{Deserialize, Serialize};

/// Outcome of a newsletter subscription attempt.
///
/// Every path resolves to one of these; the shell never surfaces a raw
/// transport error to the user.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SubscriptionResult {
    pub success: bool,
    pub message: String,
}

impl SubscriptionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Validate an email address before it goes anywhere near the network.
///
/// Returns `None` when the address is acceptable, or the rejection result
/// to show the user. Validation is deliberately loose (anything@anything.tld);
/// the backend has the final say via its 400 response.
pub fn validate_email(email: &str) -> Option<SubscriptionResult> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some(SubscriptionResult::failure("Email address is required"));
    }

    let pattern = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    if !pattern.is_match(trimmed) {
        return Some(SubscriptionResult::failure(
            "Please enter a valid email address",
        ));
    }

    None
}

/// Map the subscription endpoint's HTTP status to a user-facing result.
///
/// 409 means the address is already on the list, 400 means the backend
/// rejected the address, 5xx is a server problem, and any other non-success
/// status gets the generic message.
pub fn classify_subscribe_status(status: u16) -> SubscriptionResult {
    match status {
        200..=299 => SubscriptionResult::success(
            "Successfully subscribed! Welcome to the Ninja's Dispatch.",
        ),
        409 => SubscriptionResult::failure("This email is already subscribed to our newsletter."),
        400 => SubscriptionResult::failure("Invalid email address. Please check and try again."),
        500..=599 => SubscriptionResult::failure("Server error. Please try again later."),
        _ => SubscriptionResult::failure("Failed to subscribe. Please try again."),
    }
}

/// Result used when the request never reached the backend at all.
pub fn transport_failure() -> SubscriptionResult {
    SubscriptionResult::failure("An unexpected error occurred. Please try again.")
}
