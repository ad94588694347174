use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "paybridge")]
#[command(author, version, about = "Relay between a Telegram bot and Razorpay payment webhooks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Serve the webhook endpoints (default)
    Run,

    /// Register the Telegram and Razorpay webhooks once, then exit
    RegisterWebhooks,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
