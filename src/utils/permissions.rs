// Bot permissions needed before a guild can be initialized

use poise::serenity_prelude as serenity;
use serenity::Permissions;

/// Every capability the bot needs, with the name shown to admins
pub const REQUIRED_PERMISSIONS: &[(Permissions, &str)] = &[
    (Permissions::MANAGE_ROLES, "manage_roles"),
    (Permissions::MANAGE_CHANNELS, "manage_channels"),
    (Permissions::MANAGE_GUILD, "manage_guild"),
    (Permissions::VIEW_AUDIT_LOG, "view_audit_log"),
    (Permissions::VIEW_CHANNEL, "read_messages"),
    (Permissions::SEND_MESSAGES, "send_messages"),
    (Permissions::MANAGE_MESSAGES, "manage_messages"),
    (Permissions::EMBED_LINKS, "embed_links"),
    (Permissions::ATTACH_FILES, "attach_files"),
    (Permissions::READ_MESSAGE_HISTORY, "read_message_history"),
    (Permissions::MENTION_EVERYONE, "mention_everyone"),
    (Permissions::USE_EXTERNAL_EMOJIS, "use_external_emojis"),
    (Permissions::ADD_REACTIONS, "add_reactions"),
];

/// Union of all required flags
pub fn required_permissions() -> Permissions {
    REQUIRED_PERMISSIONS
        .iter()
        .fold(Permissions::empty(), |acc, (flag, _)| acc | *flag)
}

/// Names of required flags absent from `granted`, in declaration order
pub fn missing_permissions(granted: Permissions) -> Vec<&'static str> {
    if granted.contains(Permissions::ADMINISTRATOR) || granted.contains(required_permissions()) {
        return Vec::new();
    }

    REQUIRED_PERMISSIONS
        .iter()
        .filter(|(flag, _)| !granted.contains(*flag))
        .map(|(_, name)| *name)
        .collect()
}
