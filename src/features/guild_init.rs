// Guild initialization - permission guards and config creation

use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::store::guild_files::InitOutcome;
use crate::utils::permissions::missing_permissions;
use crate::{Context, Data, Error};

/// Why an initialization request was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitBlocked {
    NotAdministrator,
    MissingPermissions(Vec<&'static str>),
}

/// The member pressing the button must be an administrator
pub fn check_member(member_permissions: Option<serenity::Permissions>) -> Result<(), InitBlocked> {
    match member_permissions {
        Some(p) if p.administrator() => Ok(()),
        _ => Err(InitBlocked::NotAdministrator),
    }
}

/// The bot must hold every required permission
pub fn check_bot(granted: serenity::Permissions) -> Result<(), InitBlocked> {
    let missing = missing_permissions(granted);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(InitBlocked::MissingPermissions(missing))
    }
}

/// Guild-level permissions of the bot's own member.
/// When the guild is not cached this falls back to `app_permissions`, which are the
/// bot's permissions in the interaction's channel rather than the whole guild.
pub async fn bot_guild_permissions(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    app_permissions: Option<serenity::Permissions>,
) -> Result<serenity::Permissions, Error> {
    let cache = &ctx.serenity_context().cache;
    let bot_id = cache.current_user().id;
    let member = guild_id.member(ctx, bot_id).await?;

    let cached = cache
        .guild(guild_id)
        .map(|guild| guild.member_permissions(&member));

    match (cached, app_permissions) {
        (Some(p), _) => Ok(p),
        (None, Some(p)) => {
            warn!(
                "Guild {} not cached, checking channel-level app permissions instead",
                guild_id
            );
            Ok(p)
        }
        (None, None) => {
            warn!("Could not resolve bot permissions in guild {}", guild_id);
            Ok(serenity::Permissions::empty())
        }
    }
}

/// Load the template and create or backfill the guild's config file
pub async fn initialize_guild(data: &Data, guild_id: serenity::GuildId) -> Result<InitOutcome, Error> {
    let template = data.template.load().await?;
    let outcome = data.store.initialize(guild_id, &template).await?;
    info!("Guild {} initialized: {}", guild_id, outcome.message());
    Ok(outcome)
}

/// Create or backfill the guild's config, unless the bot lacks a required permission.
/// A refusal leaves the data directory untouched.
pub async fn initialize_if_permitted(
    data: &Data,
    guild_id: serenity::GuildId,
    granted: serenity::Permissions,
) -> Result<Result<InitOutcome, InitBlocked>, Error> {
    if let Err(blocked) = check_bot(granted) {
        return Ok(Err(blocked));
    }
    initialize_guild(data, guild_id).await.map(Ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::guild_files::GuildConfigStore;
    use crate::store::template::TemplateSource;
    use crate::utils::config::BotSettings;
    use crate::utils::permissions::required_permissions;
    use poise::serenity_prelude::{GuildId, Permissions};
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    fn data_in(dir: &Path) -> Data {
        let template_path = dir.join("config.json");
        std::fs::write(
            &template_path,
            r#"{ "template": { "guild": { "prefix": "!", "level": { "xp": 0 } } } }"#,
        )
        .unwrap();

        let guild_data_dir = dir.join("guilds");
        Data {
            settings: Arc::new(BotSettings {
                token: "token".to_string(),
                prefix: "!".to_string(),
                guild_data_dir: guild_data_dir.clone(),
                template_path: template_path.clone(),
                interaction_timeout: Duration::from_secs(1),
            }),
            store: Arc::new(GuildConfigStore::new(guild_data_dir)),
            template: Arc::new(TemplateSource::new(template_path)),
        }
    }

    #[test]
    fn test_member_must_be_admin() {
        assert_eq!(check_member(Some(Permissions::ADMINISTRATOR)), Ok(()));
        assert_eq!(
            check_member(Some(Permissions::MANAGE_GUILD)),
            Err(InitBlocked::NotAdministrator)
        );
        assert_eq!(check_member(None), Err(InitBlocked::NotAdministrator));
    }

    #[test]
    fn test_bot_permissions() {
        assert_eq!(check_bot(required_permissions()), Ok(()));
        assert_eq!(
            check_bot(required_permissions() - Permissions::ADD_REACTIONS),
            Err(InitBlocked::MissingPermissions(vec!["add_reactions"]))
        );
    }

    #[tokio::test]
    async fn test_missing_permissions_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let data = data_in(dir.path());
        let guild_id = GuildId::new(5);

        let result = initialize_if_permitted(
            &data,
            guild_id,
            required_permissions() - Permissions::MANAGE_ROLES,
        )
        .await
        .unwrap();

        assert_eq!(result, Err(InitBlocked::MissingPermissions(vec!["manage_roles"])));
        assert!(!dir.path().join("guilds").exists());
        assert!(data.store.load(guild_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_full_permissions_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = data_in(dir.path());
        let guild_id = GuildId::new(5);

        let result = initialize_if_permitted(&data, guild_id, required_permissions())
            .await
            .unwrap();

        assert_eq!(result, Ok(InitOutcome::Created));
        assert!(data.store.path_for(guild_id).exists());
    }
}
