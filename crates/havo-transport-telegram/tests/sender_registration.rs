use havo_core::storage::{FileUserRegistry, UserStore};
use havo_transport_telegram::bot::handlers::register_sender;
use serde_json::json;
use std::sync::Arc;
use teloxide::types::Update;

// Parsed from text: teloxide only recognises update kinds when reading a string
fn message_update(update_id: i64, user_id: i64, text: &str) -> Update {
    let raw = json!({
        "update_id": update_id,
        "message": {
            "message_id": 10,
            "date": 1_700_000_000,
            "chat": { "id": user_id, "type": "private", "first_name": "Aziz" },
            "from": { "id": user_id, "is_bot": false, "first_name": "Aziz" },
            "text": text
        }
    })
    .to_string();
    serde_json::from_str(&raw).expect("valid message update")
}

#[tokio::test]
async fn test_every_sender_is_registered_once() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("users.json");
    let registry = Arc::new(FileUserRegistry::load(&path).await?);
    let users: Arc<dyn UserStore> = registry.clone();

    assert_eq!(
        message_update(9, 111, "/myid").from().map(|user| user.id.0),
        Some(111)
    );

    register_sender(message_update(1, 111, "/start"), users.clone()).await;
    register_sender(message_update(2, 222, "hello"), users.clone()).await;
    register_sender(message_update(3, 111, "/weather Tashkent"), users.clone()).await;

    assert_eq!(registry.list_users().await, vec![111, 222]);
    assert_eq!(registry.user_count().await, 2);

    let on_disk: Vec<i64> = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(on_disk, vec![111, 222]);
    Ok(())
}
