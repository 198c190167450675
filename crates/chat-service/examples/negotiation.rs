//! Walks a buyer and a dealer through a full offer negotiation.
//!
//! Run with: cargo run -p chat-service --example negotiation
//!
//! Set RUST_LOG=debug to watch the registry, fan-out, and snapshot steps.

use chat_core::{OfferResponse, ParticipantRole};
use chat_service::ChatService;
use chat_store::MemoryStore;
use notifier::InMemorySink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let service = ChatService::load(MemoryStore::new(), InMemorySink::new()).await?;

    let conversation = service
        .start_conversation("buyer@reride.in", "dealer@reride.in", "veh_42")
        .await?;
    println!("Started conversation {}", conversation.id);

    service
        .send_message(
            &conversation.id,
            "Is this still available?",
            ParticipantRole::Customer,
        )
        .await?;
    service
        .send_message(
            &conversation.id,
            "Yes! Freshly serviced, single owner.",
            ParticipantRole::Seller,
        )
        .await?;

    let offer = service
        .send_offer(&conversation.id, 600_000, ParticipantRole::Seller)
        .await?;
    println!("Dealer offered: {}", offer.text);

    service
        .respond_to_offer(
            &conversation.id,
            &offer.id,
            OfferResponse::Counter { price: 550_000 },
            ParticipantRole::Customer,
        )
        .await?;
    service
        .respond_to_offer(
            &conversation.id,
            &offer.id,
            OfferResponse::Accept,
            ParticipantRole::Seller,
        )
        .await?;

    println!("\nTranscript:");
    let transcript = service
        .conversation(&conversation.id)
        .await
        .expect("conversation exists");
    for message in &transcript.messages {
        println!("  [{}] {}", message.sender, message.text);
    }

    println!("\nBuyer notifications:");
    for notification in service.notifications_for("buyer@reride.in").await? {
        println!("  - {}", notification.message);
    }

    Ok(())
}
