use colored::Colorize;
use ninja_core::subscribe::SubscriptionResult;

use crate::client::build_client;
use crate::prelude::{println, *};
use crate::services::{self, SiteConfig};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct SubscribeOptions {
    /// Email address to subscribe to the newsletter
    pub email: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: SubscribeOptions, global: crate::Global) -> Result<()> {
    let config = SiteConfig::from(&global);

    if global.verbose {
        println!("Subscribing via {}/subscribers", config.api_url);
    }

    let client = build_client()?;
    let result = services::subscribe_email(&client, &config, &options.email).await;

    println!("{}", format_subscribe_result(&result, options.json)?);

    if result.success {
        Ok(())
    } else {
        // The outcome is already on screen; fail without a second report.
        std::process::exit(1);
    }
}

pub fn format_subscribe_result(result: &SubscriptionResult, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(result)
            .map_err(|e| eyre!("JSON serialization failed: {}", e));
    }

    Ok(if result.success {
        result.message.green().to_string()
    } else {
        result.message.yellow().to_string()
    })
}
