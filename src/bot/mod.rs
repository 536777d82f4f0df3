pub mod commands;
pub mod handlers;

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::RequestError;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use crate::state::{AppState, SubscriberId};
pub use commands::Command;

/// Routes parsed commands to [`handlers::reply_for`]; other messages are ignored.
pub fn schema() -> UpdateHandler<RequestError> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(answer)
}

async fn answer(bot: Bot, msg: Message, cmd: Command, state: Arc<AppState>) -> ResponseResult<()> {
    let chat = SubscriberId(msg.chat.id.0);
    debug!(%chat, command = ?cmd, "command received");

    let reply = handlers::reply_for(cmd, chat, &state).await;
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Polls Telegram for commands until Ctrl-C.
pub async fn run_bot(bot: Bot, state: Arc<AppState>) {
    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %err, "failed to register bot commands");
    }

    info!("telegram command dispatcher starting");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .default_handler(|update| async move {
            debug!(update_id = ?update.id, "ignoring update");
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("telegram command dispatcher stopped");
}
