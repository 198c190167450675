//! Conversation service for ReRide.
//!
//! This crate provides the single entry point the rest of the application
//! calls to send messages, negotiate offers, mark conversations read, and
//! track typing. It composes:
//!
//! - [`ConversationRegistry`] - the in-memory source of truth
//! - a [`chat_store::SnapshotStore`] - full-snapshot persistence
//! - a [`notifier::NotificationSink`] - notification fan-out
//!
//! Operations are local-first: the registry mutates immediately, fan-out
//! and persistence follow, and a persistence failure surfaces to the
//! caller without reverting in-memory state.
//!
//! # Example
//!
//! ```rust
//! use chat_core::ParticipantRole;
//! use chat_service::ChatService;
//! use chat_store::MemoryStore;
//! use notifier::InMemorySink;
//!
//! # async fn example() -> Result<(), chat_service::ChatError> {
//! let service = ChatService::load(MemoryStore::new(), InMemorySink::new()).await?;
//! let conversation = service
//!     .start_conversation("buyer@reride.in", "dealer@reride.in", "veh_42")
//!     .await?;
//! service
//!     .send_message(&conversation.id, "Is this still available?", ParticipantRole::Customer)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod registry;
mod service;

pub use error::{ChatError, Result};
pub use registry::ConversationRegistry;
pub use service::{ChatService, TypingState};
