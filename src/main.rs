use std::sync::Arc;

use log::*;

use serenity::{
    async_trait,
    framework::StandardFramework,
    http::Http,
    model::prelude::Ready,
    prelude::{Client, Context, EventHandler, GatewayIntents},
};

mod commands;
mod config;
mod error;
mod meeting;
mod services;

pub use error::{GenericError, MeetPointError};

use commands::{PlannerContainer, GENERAL_GROUP, HELP};
use config::Config;
use meeting::Planner;
use services::GoogleMapsService;

struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
    }
}

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    env_logger::builder()
        .filter_module("meetpoint", log::LevelFilter::Debug)
        .parse_default_env()
        .init();
    trace!("Logger init.");

    let config = Config::from_env()?;
    let provider = GoogleMapsService::new(&config.provider)?;
    let planner = Planner::new(provider, config.search.clone());
    debug!("Planner ready with {:?}.", planner.policy());

    let http = Http::new(&config.discord_token);
    let bot_id = http.get_current_user().await?.id;

    let framework = StandardFramework::new()
        .configure(|c| {
            c.with_whitespace(true)
                .on_mention(Some(bot_id))
                .prefix("!meetpoint")
        })
        .help(&HELP)
        .group(&GENERAL_GROUP);

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(Handler)
        .framework(framework)
        .type_map_insert::<PlannerContainer>(Arc::new(planner))
        .await?;

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    Ok(())
}
