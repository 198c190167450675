//! Core types for the ReRide conversation service.
//!
//! This crate provides the shared domain model for the chat and offer
//! negotiation stack. It defines:
//!
//! - [`Conversation`] / [`Message`] - a customer/seller thread and its
//!   ordered message list
//! - [`OfferPayload`] / [`OfferResponse`] - the offer negotiation state
//!   machine carried inside offer messages
//! - [`Notification`] - records derived from conversation events
//! - [`OfferError`] - errors signalled by the state machine
//!
//! Everything here is synchronous and I/O free; the service and store
//! crates compose these types behind async boundaries.
//!
//! # Example
//!
//! ```rust
//! use chat_core::{OfferPayload, OfferResponse, OfferStatus};
//!
//! let mut payload = OfferPayload::new(600_000);
//! payload.respond(OfferResponse::Counter { price: 550_000 }).unwrap();
//! assert_eq!(payload.status, OfferStatus::Countered);
//! assert_eq!(payload.current_price(), 550_000);
//! ```

mod conversation;
mod error;
mod message;
mod notification;
mod offer;

pub use conversation::Conversation;
pub use error::OfferError;
pub use message::{Message, MessageKind, ParticipantRole};
pub use notification::{Notification, TargetType};
pub use offer::{format_inr, OfferPayload, OfferResponse, OfferStatus};
