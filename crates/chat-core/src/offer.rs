//! Offer negotiation state machine.
//!
//! An offer is not a separate stored entity; it lives inside a single
//! offer message, and the negotiation's current state is exactly the
//! payload's `status`. `accepted` and `rejected` are terminal. `countered`
//! behaves like a fresh `pending` from the counter-party's perspective and
//! may be countered again, with `counter_price` as the new reference price.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::OfferError;

/// Negotiation state carried by an offer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Countered,
}

impl OfferStatus {
    /// Whether no further transition is permitted from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OfferStatus::Accepted | OfferStatus::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
            OfferStatus::Countered => "countered",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price proposal attached to an offer message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPayload {
    /// Price originally proposed, in whole rupees.
    pub offer_price: i64,
    /// Current negotiation state.
    pub status: OfferStatus,
    /// Latest counter price, set once the offer has been countered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_price: Option<i64>,
}

impl OfferPayload {
    /// Create a fresh pending offer.
    pub fn new(offer_price: i64) -> Self {
        Self {
            offer_price,
            status: OfferStatus::Pending,
            counter_price: None,
        }
    }

    /// The price the next response should reference: the latest counter
    /// price if one exists, otherwise the original offer price.
    pub fn current_price(&self) -> i64 {
        self.counter_price.unwrap_or(self.offer_price)
    }

    /// Apply a response to this offer.
    ///
    /// `Accept` and `Reject` move the offer to a terminal status.
    /// `Counter` keeps the negotiation open and records the new reference
    /// price. Fails without mutating when the offer is already resolved or
    /// the counter price is not positive.
    pub fn respond(&mut self, response: OfferResponse) -> Result<(), OfferError> {
        if self.status.is_terminal() {
            return Err(OfferError::AlreadyResolved {
                status: self.status,
            });
        }

        match response {
            OfferResponse::Accept => self.status = OfferStatus::Accepted,
            OfferResponse::Reject => self.status = OfferStatus::Rejected,
            OfferResponse::Counter { price } => {
                if price <= 0 {
                    return Err(OfferError::InvalidCounterPrice { price });
                }
                self.status = OfferStatus::Countered;
                self.counter_price = Some(price);
            }
        }

        Ok(())
    }
}

/// A response to a pending or countered offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferResponse {
    Accept,
    Reject,
    Counter { price: i64 },
}

impl OfferResponse {
    /// The text message appended to the conversation alongside a
    /// successful response. The wording is part of the persisted data
    /// contract and must not change.
    pub fn outcome_text(&self) -> String {
        match self {
            OfferResponse::Accept => "✅ Offer accepted! The deal is confirmed.".to_string(),
            OfferResponse::Reject => "❌ Offer declined. Thank you for your interest.".to_string(),
            OfferResponse::Counter { price } => {
                format!("💰 Counter-offer made: ₹{}", format_inr(*price))
            }
        }
    }
}

/// Format a rupee amount with Indian digit grouping: the last three digits
/// form one group and the remaining digits split into pairs, so 550000
/// renders as `5,50,000`.
pub fn format_inr(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut start = 0;
        if head.len() % 2 == 1 {
            parts.push(&head[..1]);
            start = 1;
        }
        while start < head.len() {
            parts.push(&head[start..start + 2]);
            start += 2;
        }
        parts.push(tail);
        parts.join(",")
    };

    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_from_pending_is_terminal() {
        let mut payload = OfferPayload::new(600_000);
        payload.respond(OfferResponse::Accept).unwrap();
        assert_eq!(payload.status, OfferStatus::Accepted);

        let err = payload.respond(OfferResponse::Accept).unwrap_err();
        assert_eq!(
            err,
            OfferError::AlreadyResolved {
                status: OfferStatus::Accepted
            }
        );
    }

    #[test]
    fn test_reject_from_pending_is_terminal() {
        let mut payload = OfferPayload::new(600_000);
        payload.respond(OfferResponse::Reject).unwrap();
        assert_eq!(payload.status, OfferStatus::Rejected);

        let err = payload
            .respond(OfferResponse::Counter { price: 550_000 })
            .unwrap_err();
        assert!(matches!(err, OfferError::AlreadyResolved { .. }));
    }

    #[test]
    fn test_counter_keeps_negotiation_open() {
        let mut payload = OfferPayload::new(600_000);
        payload
            .respond(OfferResponse::Counter { price: 550_000 })
            .unwrap();
        assert_eq!(payload.status, OfferStatus::Countered);
        assert_eq!(payload.counter_price, Some(550_000));
        assert_eq!(payload.current_price(), 550_000);

        // A countered offer behaves like a fresh pending one.
        payload
            .respond(OfferResponse::Counter { price: 575_000 })
            .unwrap();
        assert_eq!(payload.current_price(), 575_000);

        payload.respond(OfferResponse::Accept).unwrap();
        assert_eq!(payload.status, OfferStatus::Accepted);
    }

    #[test]
    fn test_counter_requires_positive_price() {
        let mut payload = OfferPayload::new(600_000);

        let err = payload
            .respond(OfferResponse::Counter { price: 0 })
            .unwrap_err();
        assert_eq!(err, OfferError::InvalidCounterPrice { price: 0 });

        // A failed response leaves the payload untouched.
        assert_eq!(payload.status, OfferStatus::Pending);
        assert_eq!(payload.counter_price, None);
    }

    #[test]
    fn test_outcome_texts() {
        assert_eq!(
            OfferResponse::Accept.outcome_text(),
            "✅ Offer accepted! The deal is confirmed."
        );
        assert_eq!(
            OfferResponse::Reject.outcome_text(),
            "❌ Offer declined. Thank you for your interest."
        );
        assert_eq!(
            OfferResponse::Counter { price: 550_000 }.outcome_text(),
            "💰 Counter-offer made: ₹5,50,000"
        );
    }

    #[test]
    fn test_format_inr_grouping() {
        assert_eq!(format_inr(0), "0");
        assert_eq!(format_inr(999), "999");
        assert_eq!(format_inr(1_000), "1,000");
        assert_eq!(format_inr(55_000), "55,000");
        assert_eq!(format_inr(550_000), "5,50,000");
        assert_eq!(format_inr(600_000), "6,00,000");
        assert_eq!(format_inr(1_234_567), "12,34,567");
        assert_eq!(format_inr(10_000_000), "1,00,00,000");
        assert_eq!(format_inr(-550_000), "-5,50,000");
    }

    #[test]
    fn test_payload_serde_shape() {
        let payload = OfferPayload::new(600_000);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "offerPrice": 600_000, "status": "pending" })
        );

        let mut countered = payload.clone();
        countered
            .respond(OfferResponse::Counter { price: 550_000 })
            .unwrap();
        let json = serde_json::to_value(&countered).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "offerPrice": 600_000,
                "status": "countered",
                "counterPrice": 550_000
            })
        );
    }
}
