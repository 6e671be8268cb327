//! Notify the occupant left behind when its peer leaves a room.

use crate::domain::{
    ConnectionId, MessagePusher, RemoveResult, ServerEvent, Session, SessionRepository,
};

use super::PairingLock;

/// Move the remaining occupant back to `Waiting` and send it `user_left`.
///
/// Only a remaining occupant that was `Paired` is notified. One that is still
/// joining, or that was waiting because the pairing never completed, was never
/// told about the departed peer and is left alone.
///
/// Returns the notified connection, or `None` when nobody was notified.
pub(crate) async fn notify_peer_left(
    sessions: &dyn SessionRepository,
    message_pusher: &dyn MessagePusher,
    pairing: &PairingLock,
    result: &RemoveResult,
) -> Option<ConnectionId> {
    let (Some(removed), Some(remaining)) = (&result.removed, &result.remaining) else {
        return None;
    };

    let _pairing = pairing.acquire().await;

    let room = result.room.clone();
    if let Err(e) = sessions
        .update(
            &remaining.connection_id,
            Box::new(move |s: &mut Session| s.unpair(&room)),
        )
        .await
    {
        tracing::debug!(
            "Not notifying '{}' that '{}' left room '{}': {}",
            remaining.connection_id,
            removed.username,
            result.room,
            e
        );
        return None;
    }

    let event = ServerEvent::UserLeft {
        other_user: removed.username.clone(),
    };
    if let Err(e) = message_pusher
        .push_to(&remaining.connection_id, &event)
        .await
    {
        tracing::warn!(
            "Failed to notify '{}' that '{}' left: {}",
            remaining.connection_id,
            removed.username,
            e
        );
    } else {
        tracing::info!(
            "Notified '{}' in room '{}' that '{}' left",
            remaining.username,
            result.room,
            removed.username
        );
    }

    Some(remaining.connection_id.clone())
}
