use async_trait::async_trait;
use thiserror::Error;

use crate::state::SubscriberId;

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The recipient can never be reached again (blocked the bot, account
    /// deleted, bot removed from the chat) until they subscribe anew.
    #[error("recipient is gone: {0}")]
    RecipientGone(String),

    #[error("delivery failed: {0}")]
    Transient(String),
}

impl DeliveryError {
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::RecipientGone(_))
    }
}

/// Outbound side of the messaging channel.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send_text(&self, recipient: SubscriberId, text: &str) -> Result<(), DeliveryError>;
}
