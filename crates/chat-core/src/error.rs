//! Error types for the offer state machine.

use thiserror::Error;

use crate::offer::OfferStatus;

/// Errors signalled by the offer negotiation state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OfferError {
    /// The offer has already reached a terminal status and cannot be
    /// negotiated further.
    #[error("offer is already {status} and cannot be modified")]
    AlreadyResolved { status: OfferStatus },

    /// A counter-offer was made with a non-positive price.
    #[error("counter price must be positive, got {price}")]
    InvalidCounterPrice { price: i64 },
}
