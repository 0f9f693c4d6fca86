// Codygen Bot - Settings
// Per-guild configuration management for Discord servers

mod commands;
mod features;
mod models;
mod store;
mod utils;

use std::env;
use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::features::settings_ui;
use crate::store::guild_files::GuildConfigStore;
use crate::store::template::TemplateSource;
use crate::utils::config::BotSettings;

/// User data shared across all commands
#[derive(Debug)]
pub struct Data {
    pub settings: Arc<BotSettings>,
    pub store: Arc<GuildConfigStore>,
    pub template: Arc<TemplateSource>,
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Register all slash commands
fn get_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        commands::settings::settings(),
        commands::help::help(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Command error in /{}: {:?}", ctx.command().qualified_name, error);
            let _ = ctx
                .send(
                    poise::CreateReply::default()
                        .content(format!("Error: {}", error))
                        .ephemeral(true),
                )
                .await;
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            warn!(
                "{} was denied /{}",
                ctx.author().name,
                ctx.command().qualified_name
            );
            let _ = ctx
                .send(
                    poise::CreateReply::default()
                        .embed(settings_ui::access_denied_embed())
                        .ephemeral(true),
                )
                .await;
        }
        poise::FrameworkError::GuildOnly { ctx, .. } => {
            let _ = ctx
                .send(
                    poise::CreateReply::default()
                        .content(settings_ui::GUILD_ONLY_MESSAGE)
                        .ephemeral(true),
                )
                .await;
        }
        err => {
            error!("Framework error: {:?}", err);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "codygen=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Arc::new(BotSettings::from_env()?);
    info!("Starting Codygen...");

    let store = Arc::new(GuildConfigStore::new(&settings.guild_data_dir));
    let template = Arc::new(TemplateSource::new(&settings.template_path));
    info!(
        "Guild configs in {}, template from {}",
        settings.guild_data_dir.display(),
        settings.template_path.display()
    );

    let data = Data {
        settings: settings.clone(),
        store,
        template,
    };

    // Setup framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: get_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(settings.prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready! Registering commands...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Settings: loaded.");
                Ok(data)
            })
        })
        .build();

    // MESSAGE_CONTENT is privileged, enable it in the Discord Dev Portal for prefix commands
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES;

    let mut client = serenity::ClientBuilder::new(&settings.token, intents)
        .framework(framework)
        .await
        .context("Failed to create client")?;

    // Run with graceful shutdown
    let shard_manager = client.shard_manager.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to register Ctrl+C handler: {:?}", e);
            return;
        }
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    info!("Goodbye!");
    Ok(())
}
