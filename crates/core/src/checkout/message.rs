use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::domain::order::OrderSummary;
use rust_decimal::Decimal;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Messaging-service host, e.g. `wa.me`.
    pub domain: String,
    /// Fixed recipient identifier (digits only, country code included).
    pub recipient: String,
}

/// The rendered order request plus the link that carries it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageHandoff {
    pub message: String,
    pub url: String,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MessageHandoffError {
    #[error("no products selected")]
    EmptyOrder,
    #[error("delivery address is required")]
    MissingDeliveryAddress,
    #[error("messaging link could not be built: {0}")]
    InvalidLink(String),
}

pub fn yards_word(count: u32) -> &'static str {
    if count == 1 {
        "yard"
    } else {
        "yards"
    }
}

/// `₦` amount with thousands separators; fractional kobo kept only when
/// present.
pub fn format_naira(amount: Decimal) -> String {
    let normalized = amount.normalize();
    let text = normalized.to_string();
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };

    let mut grouped = String::new();
    for (index, ch) in digits.chars().enumerate() {
        let remaining = digits.len() - index;
        if index > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("₦{sign}{grouped}.{fraction}"),
        None => format!("₦{sign}{grouped}"),
    }
}

/// Renders the order request text: numbered item lines, totals, the
/// delivery address block when one was collected, and a fixed courtesy
/// footer.
pub fn order_message(summary: &OrderSummary, delivery_address: Option<&str>) -> String {
    let mut message = String::from("🎯 New Order Request\n\n");
    message.push_str("📦 ITEMS:\n");

    for (index, item) in summary.items.iter().enumerate() {
        message.push_str(&format!(
            "{}. {}\n   {} {}\n\n",
            index + 1,
            item.name,
            item.quantity,
            yards_word(item.quantity)
        ));
    }

    message.push_str(&format!(
        "📏 TOTAL: {} {}\n",
        summary.total_yards,
        yards_word(summary.total_yards)
    ));
    message.push_str(&format!("💰 AMOUNT: {}\n\n", format_naira(summary.total_amount)));

    if let Some(address) = delivery_address {
        message.push_str(&format!("📍 DELIVERY ADDRESS:\n{address}\n\n"));
    }

    message.push_str("Please confirm availability and delivery details. Thank you! 🙏");
    message
}

/// Builds the full handoff: rendered message plus
/// `https://<domain>/<recipient>?text=<encoded message>`. A blank address
/// is rejected once the shopper has passed the reveal stage; passing
/// `None` omits the address block entirely.
pub fn message_handoff(
    summary: &OrderSummary,
    delivery_address: Option<&str>,
    config: &MessagingConfig,
) -> Result<MessageHandoff, MessageHandoffError> {
    if summary.is_empty() {
        return Err(MessageHandoffError::EmptyOrder);
    }

    let address = match delivery_address {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(MessageHandoffError::MissingDeliveryAddress);
            }
            Some(trimmed)
        }
        None => None,
    };

    let message = order_message(summary, address);

    let mut url = Url::parse(&format!("https://{}/{}", config.domain, config.recipient))
        .map_err(|error| MessageHandoffError::InvalidLink(error.to_string()))?;
    url.query_pairs_mut().append_pair("text", &message);

    Ok(MessageHandoff { message, url: url.to_string() })
}
