//! Two subscribers chatting in one room
//!
//! Run with: cargo run --example chat_room
//!
//! Set RUST_LOG=roomcast=debug to see fan-out details.
//!
//! ## What happens
//!
//! - Alice joins R1, then Bob joins and receives Alice's join notice as replay
//! - Alice says "hi"; Bob receives it, Alice does not get an echo
//! - Bob leaves; Alice receives the leave notice

use std::time::Duration;

use roomcast::{ChatService, JoinRequest, ListRoomsRequest, SendRequest, Subscription};

/// Print everything a subscription yields until it terminates
fn spawn_printer(label: &'static str, mut subscription: Subscription) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = subscription.recv().await {
            println!(
                "[{}] {:?} from {}: {}",
                label, message.kind, message.author_name, message.content
            );
        }
        println!("[{}] stream ended", label);
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roomcast=info".parse()?),
        )
        .init();

    let service = ChatService::new();

    let alice = service.join(JoinRequest::new("R1", "a", "Alice")).await?;
    let alice_task = spawn_printer("alice", alice);

    let bob = service.join(JoinRequest::new("R1", "b", "Bob")).await?;
    let bob_id = bob.session_id();
    let bob_task = spawn_printer("bob", bob);

    let ack = service.send(SendRequest::new("R1", "a", "hi")).await?;
    println!("sent {} (success={})", ack.message_id, ack.success);

    tokio::time::sleep(Duration::from_millis(50)).await;

    service.leave("R1", "b").await?;
    bob_task.await?;
    println!("bob's {} terminated", bob_id);

    for room in service.list_rooms(ListRoomsRequest).await {
        println!(
            "room {} ({}): {} subscriber(s), created {}",
            room.id, room.name, room.subscriber_count, room.created_at
        );
    }

    service.leave("R1", "a").await?;
    alice_task.await?;

    Ok(())
}
