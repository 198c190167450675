//! End-to-end flows through the conversation service: first contact,
//! offer negotiation, and read tracking.

use chat_core::{OfferResponse, OfferStatus, ParticipantRole};
use chat_service::{ChatError, ChatService};
use chat_store::MemoryStore;
use notifier::InMemorySink;

async fn service() -> ChatService<MemoryStore, InMemorySink> {
    ChatService::load(MemoryStore::new(), InMemorySink::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn first_message_notifies_the_seller() {
    let service = service().await;
    let conv = service
        .start_conversation("buyer@reride.in", "dealer@reride.in", "veh_42")
        .await
        .unwrap();

    let message = service
        .send_message(&conv.id, "Is this still available?", ParticipantRole::Customer)
        .await
        .unwrap();

    let stored = service.conversation(&conv.id).await.unwrap();
    assert_eq!(stored.messages.len(), 1);
    assert_eq!(stored.last_message_at, message.timestamp);
    assert!(!stored.is_read_by_seller);

    let inbox = service.notifications_for("dealer@reride.in").await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].message, "Is this still available?");
    assert_eq!(inbox[0].target_id, conv.id);
}

#[tokio::test]
async fn counter_offer_updates_payload_and_appends_summary() {
    let service = service().await;
    let conv = service
        .start_conversation("buyer@reride.in", "dealer@reride.in", "veh_42")
        .await
        .unwrap();

    let offer = service
        .send_offer(&conv.id, 600_000, ParticipantRole::Seller)
        .await
        .unwrap();

    service
        .respond_to_offer(
            &conv.id,
            &offer.id,
            OfferResponse::Counter { price: 550_000 },
            ParticipantRole::Customer,
        )
        .await
        .unwrap();

    let stored = service.conversation(&conv.id).await.unwrap();
    assert_eq!(stored.messages.len(), 2);

    let payload = stored.messages[0].offer_payload().unwrap();
    assert_eq!(payload.offer_price, 600_000);
    assert_eq!(payload.status, OfferStatus::Countered);
    assert_eq!(payload.counter_price, Some(550_000));

    assert_eq!(stored.messages[1].text, "💰 Counter-offer made: ₹5,50,000");
    assert_eq!(stored.last_message_at, stored.messages[1].timestamp);
}

#[tokio::test]
async fn responding_to_a_rejected_offer_changes_nothing() {
    let service = service().await;
    let conv = service
        .start_conversation("buyer@reride.in", "dealer@reride.in", "veh_42")
        .await
        .unwrap();
    let offer = service
        .send_offer(&conv.id, 600_000, ParticipantRole::Seller)
        .await
        .unwrap();
    service
        .respond_to_offer(
            &conv.id,
            &offer.id,
            OfferResponse::Reject,
            ParticipantRole::Customer,
        )
        .await
        .unwrap();
    let before = service.conversation(&conv.id).await.unwrap();
    let notified = service.sink().len().await;

    let err = service
        .respond_to_offer(
            &conv.id,
            &offer.id,
            OfferResponse::Accept,
            ParticipantRole::Customer,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Offer(_)));
    assert_eq!(service.conversation(&conv.id).await.unwrap(), before);
    assert_eq!(service.sink().len().await, notified);
}

#[tokio::test]
async fn repeated_counters_then_accept() {
    let service = service().await;
    let conv = service
        .start_conversation("buyer@reride.in", "dealer@reride.in", "veh_42")
        .await
        .unwrap();
    let offer = service
        .send_offer(&conv.id, 600_000, ParticipantRole::Seller)
        .await
        .unwrap();

    service
        .respond_to_offer(
            &conv.id,
            &offer.id,
            OfferResponse::Counter { price: 550_000 },
            ParticipantRole::Customer,
        )
        .await
        .unwrap();
    service
        .respond_to_offer(
            &conv.id,
            &offer.id,
            OfferResponse::Counter { price: 575_000 },
            ParticipantRole::Seller,
        )
        .await
        .unwrap();
    service
        .respond_to_offer(
            &conv.id,
            &offer.id,
            OfferResponse::Accept,
            ParticipantRole::Customer,
        )
        .await
        .unwrap();

    let stored = service.conversation(&conv.id).await.unwrap();
    let payload = stored.messages[0].offer_payload().unwrap();
    assert_eq!(payload.status, OfferStatus::Accepted);
    assert_eq!(payload.counter_price, Some(575_000));

    // One offer message plus three outcome messages.
    assert_eq!(stored.messages.len(), 4);
    assert_eq!(
        stored.messages[3].text,
        "✅ Offer accepted! The deal is confirmed."
    );
}

#[tokio::test]
async fn mark_read_with_only_own_messages_still_succeeds() {
    let service = service().await;
    let conv = service
        .start_conversation("buyer@reride.in", "dealer@reride.in", "veh_42")
        .await
        .unwrap();
    service
        .send_message(&conv.id, "hello", ParticipantRole::Customer)
        .await
        .unwrap();
    service
        .send_message(&conv.id, "anyone there?", ParticipantRole::Customer)
        .await
        .unwrap();

    service
        .mark_read(&conv.id, ParticipantRole::Customer)
        .await
        .unwrap();

    let stored = service.conversation(&conv.id).await.unwrap();
    assert!(stored.messages.iter().all(|m| !m.is_read));
    assert!(stored.is_read_by_customer);
}

#[tokio::test]
async fn long_message_notification_is_truncated() {
    let service = service().await;
    let conv = service
        .start_conversation("buyer@reride.in", "dealer@reride.in", "veh_42")
        .await
        .unwrap();

    let text = "y".repeat(73);
    service
        .send_message(&conv.id, &text, ParticipantRole::Seller)
        .await
        .unwrap();

    let inbox = service.notifications_for("buyer@reride.in").await.unwrap();
    assert_eq!(inbox[0].message.chars().count(), 53);
    assert!(inbox[0].message.ends_with("..."));
}

#[tokio::test]
async fn snapshot_survives_a_restart() {
    let service = service().await;
    let conv = service
        .start_conversation("buyer@reride.in", "dealer@reride.in", "veh_42")
        .await
        .unwrap();
    let offer = service
        .send_offer(&conv.id, 600_000, ParticipantRole::Seller)
        .await
        .unwrap();
    service
        .respond_to_offer(
            &conv.id,
            &offer.id,
            OfferResponse::Counter { price: 550_000 },
            ParticipantRole::Customer,
        )
        .await
        .unwrap();

    // Hand the final snapshot to a fresh service, as a restart would.
    let snapshot = service.registry().snapshot().await;
    let restarted = ChatService::load(MemoryStore::seeded(snapshot), InMemorySink::new())
        .await
        .unwrap();

    let restored = restarted.conversation(&conv.id).await.unwrap();
    assert_eq!(restored, service.conversation(&conv.id).await.unwrap());
}
