// Settings commands - view/edit guild config and run first-time setup

use futures::StreamExt;
use poise::serenity_prelude as serenity;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::features::guild_init::{self, InitBlocked};
use crate::features::settings_ui as ui;
use crate::models::guild::GuildConfig;
use crate::{Context, Error};

/// Settings commands to manage your bot instance.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    subcommands("config", "init")
)]
pub async fn settings(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Change the configurations for your guild.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
pub async fn config(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.send(poise::CreateReply::default().content(ui::GUILD_ONLY_MESSAGE).ephemeral(true))
            .await?;
        return Ok(());
    };

    let data = ctx.data();
    let Some(config) = data.store.load(guild_id).await? else {
        ctx.send(poise::CreateReply::default().content(ui::NO_CONFIG_MESSAGE).ephemeral(true))
            .await?;
        return Ok(());
    };

    let path = data.store.path_for(guild_id);
    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(ui::config_embed(&path, &config))
                .components(ui::config_components(false))
                .ephemeral(true),
        )
        .await?;

    let msg = reply.message().await?;
    let mut collector = msg
        .await_component_interactions(ctx)
        .timeout(data.settings.interaction_timeout)
        .stream();

    while let Some(interaction) = collector.next().await {
        if interaction.data.custom_id != ui::EDIT_CONFIG_BUTTON_ID {
            continue;
        }

        if let Err(e) = open_edit_modal(ctx, &interaction, &config).await {
            error!("Edit modal failed in guild {}: {:?}", guild_id, e);
        }
    }

    let _ = reply
        .edit(
            ctx,
            poise::CreateReply::default()
                .embed(ui::config_embed(&path, &config))
                .components(ui::config_components(true)),
        )
        .await;

    Ok(())
}

/// Show the edit form and acknowledge what the admin submitted
async fn open_edit_modal(
    ctx: Context<'_>,
    interaction: &serenity::ComponentInteraction,
    config: &GuildConfig,
) -> Result<(), Error> {
    let modal_id = format!("{}_{}", ui::EDIT_MODAL_PREFIX, interaction.id);

    let Some(modal) = ui::edit_modal(&modal_id, config) else {
        interaction
            .create_response(
                ctx,
                serenity::CreateInteractionResponse::Message(
                    serenity::CreateInteractionResponseMessage::new()
                        .content("There is nothing to edit in this configuration.")
                        .ephemeral(true),
                ),
            )
            .await?;
        return Ok(());
    };

    interaction
        .create_response(ctx, serenity::CreateInteractionResponse::Modal(modal))
        .await?;

    // Waiting here would stall the button collector while the modal is open
    let serenity_ctx = ctx.serenity_context().clone();
    let timeout = ctx.data().settings.interaction_timeout;
    tokio::spawn(async move {
        if let Err(e) = await_edit_submission(serenity_ctx, modal_id, timeout).await {
            error!("Edit modal submission failed: {:?}", e);
        }
    });

    Ok(())
}

/// Wait for one submission of the given modal and acknowledge it
async fn await_edit_submission(
    ctx: serenity::Context,
    modal_id: String,
    timeout: Duration,
) -> Result<(), Error> {
    let expected = modal_id.clone();
    let submission = serenity::ModalInteractionCollector::new(&ctx)
        .filter(move |m| m.data.custom_id == expected)
        .timeout(timeout)
        .next()
        .await;

    let Some(submission) = submission else {
        debug!("Edit modal {} closed or timed out", modal_id);
        return Ok(());
    };

    let values = ui::submitted_values(&submission.data.components);
    // Submitted values are acknowledged only; nothing is written to the guild's file.
    info!(
        "Config edit submitted by {} in {:?} (not persisted): {:?}",
        submission.user.name, submission.guild_id, values
    );

    submission
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(ui::submission_ack(&values))
                    .ephemeral(true),
            ),
        )
        .await?;

    Ok(())
}

/// Check if the bot has valid permissions and create a config.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "ADMINISTRATOR",
    default_member_permissions = "ADMINISTRATOR"
)]
pub async fn init(ctx: Context<'_>) -> Result<(), Error> {
    if let poise::Context::Prefix(_) = ctx {
        ctx.send(poise::CreateReply::default().content(ui::PREFIX_INIT_GUIDANCE).ephemeral(true))
            .await?;
        return Ok(());
    }

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(ui::init_home_embed())
                .components(ui::init_home_components(false))
                .ephemeral(true),
        )
        .await?;

    let msg = reply.message().await?;
    let mut collector = msg
        .await_component_interactions(ctx)
        .timeout(ctx.data().settings.interaction_timeout)
        .stream();

    while let Some(interaction) = collector.next().await {
        if interaction.data.custom_id != ui::INIT_BUTTON_ID {
            continue;
        }

        if let Err(e) = run_initialization(ctx, &interaction).await {
            error!("Initialization failed: {:?}", e);
            let _ = interaction
                .create_followup(
                    ctx,
                    serenity::CreateInteractionResponseFollowup::new()
                        .content(format!("Initialization failed: {}", e))
                        .ephemeral(true),
                )
                .await;
        }
    }

    let _ = reply
        .edit(
            ctx,
            poise::CreateReply::default()
                .embed(ui::init_home_embed())
                .components(ui::init_home_components(true)),
        )
        .await;

    Ok(())
}

/// Handle one press of the Start button
async fn run_initialization(
    ctx: Context<'_>,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), Error> {
    let member_permissions = interaction.member.as_ref().and_then(|m| m.permissions);
    if let Err(InitBlocked::NotAdministrator) = guild_init::check_member(member_permissions) {
        warn!("Non-admin {} pressed the init button", interaction.user.name);
        interaction
            .create_response(
                ctx,
                serenity::CreateInteractionResponse::Message(
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(ui::access_denied_embed())
                        .ephemeral(true),
                ),
            )
            .await?;
        return Ok(());
    }

    interaction
        .create_response(
            ctx,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .embed(ui::init_progress_embed())
                    .ephemeral(true),
            ),
        )
        .await?;

    let guild_id = interaction.guild_id.ok_or(ui::GUILD_ONLY_MESSAGE)?;
    let granted =
        guild_init::bot_guild_permissions(ctx, guild_id, interaction.app_permissions).await?;

    let embed = match guild_init::initialize_if_permitted(ctx.data(), guild_id, granted).await? {
        Ok(outcome) => ui::init_finished_embed(&outcome),
        Err(InitBlocked::MissingPermissions(missing)) => {
            info!("Init aborted in guild {}: missing {:?}", guild_id, missing);
            ui::missing_permissions_embed(&missing)
        }
        Err(InitBlocked::NotAdministrator) => ui::access_denied_embed(),
    };

    interaction
        .create_followup(
            ctx,
            serenity::CreateInteractionResponseFollowup::new()
                .embed(embed)
                .ephemeral(true),
        )
        .await?;

    Ok(())
}
