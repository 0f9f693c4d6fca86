// Help command - show usage guide

use poise::serenity_prelude as serenity;
use crate::{Context, Error};
use crate::utils::config::colors;

/// Show help and usage guide
#[poise::command(slash_command, prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let prefix = &ctx.data().settings.prefix;

    let embed = serenity::CreateEmbed::new()
        .title("Codygen - Help")
        .description("Settings commands to manage your bot instance.")
        .color(colors::INFO)
        .field(
            "Setup",
            "`/settings init` - Check the bot's permissions and create this server's config\n\
            Slash command only, requires Administrator",
            false,
        )
        .field(
            "Configuration",
            format!(
                "`/settings config` or `{}settings config` - View the current config \
                and open the edit form\nRequires Administrator",
                prefix
            ),
            false,
        )
        .footer(serenity::CreateEmbedFooter::new("Built with Serenity & Poise"));

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true)).await?;

    Ok(())
}
