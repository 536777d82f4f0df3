use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::{ApiError, RequestError};
use tracing::debug;

use super::traits::{DeliveryError, MessageSink};
use crate::state::SubscriberId;

/// Delivers alerts as plain-text Telegram messages.
#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessageSink for TelegramSink {
    async fn send_text(&self, recipient: SubscriberId, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(ChatId(recipient.0), text)
            .await
            .map_err(classify)?;

        debug!(%recipient, length = text.len(), "telegram message sent");
        Ok(())
    }
}

/// Splits Telegram errors into "this chat is gone for good" and everything else.
pub fn classify(err: RequestError) -> DeliveryError {
    match err {
        RequestError::Api(
            api @ (ApiError::BotBlocked
            | ApiError::UserDeactivated
            | ApiError::BotKicked
            | ApiError::BotKickedFromSupergroup),
        ) => DeliveryError::RecipientGone(api.to_string()),
        other => DeliveryError::Transient(other.to_string()),
    }
}
