use teloxide::utils::command::BotCommands;

/// The closed set of chat commands the bot understands.
#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "subscribe to price alerts")]
    Start,
    #[command(description = "show the current price")]
    Price,
    #[command(description = "show bot status")]
    Status,
    #[command(description = "stop price alerts")]
    Stop,
    #[command(description = "show this list")]
    Help,
}
