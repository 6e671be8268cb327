//! Addressed-send capability used to notify connections.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, event::ServerEvent, value_object::ConnectionId};

/// Outbound channel of one connection; carries encoded frames
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// Sends events to connections by id. Implementations own the encoding
/// and the transport; callers never see either.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register the outbound channel of a newly accepted connection
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Forget a connection's outbound channel
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Send one event to one connection
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// Send one event to several connections, skipping the ones that fail
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;
}
