// Embeds, buttons and modals for the settings commands

use poise::serenity_prelude as serenity;
use std::collections::HashSet;
use std::path::Path;

use crate::models::guild::GuildConfig;
use crate::store::guild_files::InitOutcome;
use crate::utils::config::colors;
use crate::utils::formatters::{code_list, json_code_block, pretty_json, truncate};

pub const INIT_BUTTON_ID: &str = "init_button";
pub const EDIT_CONFIG_BUTTON_ID: &str = "edit_config_button";
pub const EDIT_MODAL_PREFIX: &str = "edit_config_modal";

/// Discord refuses modals with more than five inputs
pub const MAX_MODAL_INPUTS: usize = 5;

const EMBED_DESCRIPTION_LIMIT: usize = 4096;
const INPUT_LABEL_LIMIT: usize = 45;
const INPUT_VALUE_LIMIT: usize = 4000;
const CUSTOM_ID_LIMIT: usize = 100;

pub const GUILD_ONLY_MESSAGE: &str = "This command can only be used in a server.";

pub const PREFIX_INIT_GUIDANCE: &str = "## A prefixed command won't work for this.\n\
    ### Please use the `/settings init` command instead.";

pub const NO_CONFIG_MESSAGE: &str =
    "This server has no configuration yet. Run `/settings init` to create one.";

// ============ Initialization ============

pub fn init_home_embed() -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Codygen - Initialization")
        .description(
            "## Hi! Welcome to Codygen :3\nPress the button below to start the initialization",
        )
}

pub fn init_home_components(disabled: bool) -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(INIT_BUTTON_ID)
            .label("Start")
            .style(serenity::ButtonStyle::Success)
            .disabled(disabled),
    ])]
}

pub fn access_denied_embed() -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Access Denied")
        .description("### You must have admin to run this, silly!")
        .color(colors::ERROR)
}

pub fn init_progress_embed() -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Initialization in Progress... Hang on!")
        .description("This message will update once it's done :3")
        .color(colors::ERROR)
}

pub fn missing_permissions_embed(missing: &[&str]) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Init Failed: Missing Permissions")
        .description(format!(
            "### Missing the following permissions: {}\nPlease fix the permissions and try again!",
            code_list(missing)
        ))
        .color(colors::ERROR)
}

pub fn init_finished_embed(outcome: &InitOutcome) -> serenity::CreateEmbed {
    let mut report = format!(
        "Permissions\n> The bot has sufficient permissions to work!\nConfig\n> {}",
        outcome.message()
    );
    if let InitOutcome::Updated { added } = outcome {
        if !added.is_empty() {
            let names: Vec<&str> = added.iter().map(String::as_str).collect();
            report.push_str(&format!("\n> Added: {}", code_list(&names)));
        }
    }

    serenity::CreateEmbed::new()
        .title("Initialization Finished!")
        .description("No errors found")
        .color(colors::SUCCESS)
        .field("Tests Passed", truncate(&report, 1024), false)
}

// ============ Config view ============

pub fn config_embed(path: &Path, config: &GuildConfig) -> serenity::CreateEmbed {
    let header = format!("Path to your config file: `{}`\nCurrent config: ", path.display());
    let footer = "\n## Use the navigation menu below to change your config";

    let json = pretty_json(&config.display_view()).unwrap_or_else(|_| "{}".to_string());
    let budget = EMBED_DESCRIPTION_LIMIT
        .saturating_sub(header.chars().count() + footer.chars().count());

    serenity::CreateEmbed::new()
        .title("Configure Codygen")
        .description(format!("{}{}{}", header, json_code_block(&json, budget), footer))
        .color(colors::NEUTRAL)
}

pub fn config_components(disabled: bool) -> Vec<serenity::CreateActionRow> {
    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(EDIT_CONFIG_BUTTON_ID)
            .label("Edit Configuration")
            .style(serenity::ButtonStyle::Primary)
            .disabled(disabled),
    ])]
}

/// One text input per editable value, pre-filled. `None` when nothing is editable.
/// Blank paths are skipped, as is any path whose truncated input id is already taken.
pub fn edit_modal(custom_id: &str, config: &GuildConfig) -> Option<serenity::CreateModal> {
    let mut seen_ids = HashSet::new();
    let rows: Vec<serenity::CreateActionRow> = config
        .editable_entries()
        .into_iter()
        .filter(|(path, _)| !path.trim().is_empty())
        .map(|(path, value)| (truncate(&path, CUSTOM_ID_LIMIT), path, value))
        .filter(|(input_id, _, _)| seen_ids.insert(input_id.clone()))
        .take(MAX_MODAL_INPUTS)
        .map(|(input_id, path, value)| {
            serenity::CreateActionRow::InputText(
                serenity::CreateInputText::new(
                    serenity::InputTextStyle::Short,
                    truncate(&path, INPUT_LABEL_LIMIT),
                    input_id,
                )
                .value(truncate(&value, INPUT_VALUE_LIMIT))
                .required(false),
            )
        })
        .collect();

    if rows.is_empty() {
        return None;
    }

    Some(serenity::CreateModal::new(custom_id, "Edit Configuration").components(rows))
}

/// `(custom_id, value)` for every text input in a submitted modal
pub fn submitted_values(rows: &[serenity::ActionRow]) -> Vec<(String, String)> {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .filter_map(|component| match component {
            serenity::ActionRowComponent::InputText(input) => Some((
                input.custom_id.clone(),
                input.value.clone().unwrap_or_default(),
            )),
            _ => None,
        })
        .collect()
}

pub fn submission_ack(values: &[(String, String)]) -> String {
    if values.is_empty() {
        return "No values were submitted.".to_string();
    }

    values
        .iter()
        .map(|(key, value)| format!("`{}` updated to `{}`", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn config(value: Value) -> GuildConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_config_embed_hides_reserved_key() {
        let cfg = config(json!({ "prefix": "!", "level": { "xp": 10 } }));
        let embed = serde_json::to_value(config_embed(Path::new("data/guilds/1.json"), &cfg)).unwrap();

        let description = embed["description"].as_str().unwrap();
        assert!(description.contains("`data/guilds/1.json`"));
        assert!(description.contains("\"prefix\": \"!\""));
        assert!(!description.contains("xp"));
        assert_eq!(embed["title"], "Configure Codygen");
    }

    #[test]
    fn test_config_embed_fits_description_limit() {
        let big: serde_json::Map<String, Value> = (0..500)
            .map(|i| (format!("key_{i}"), json!("a fairly long value to pad things out")))
            .collect();
        let embed = serde_json::to_value(config_embed(
            Path::new("data/guilds/1.json"),
            &GuildConfig::new(big),
        ))
        .unwrap();

        let description = embed["description"].as_str().unwrap();
        assert!(description.chars().count() <= EMBED_DESCRIPTION_LIMIT);
        assert!(description.ends_with("change your config"));
    }

    #[test]
    fn test_missing_permissions_embed_lists_names() {
        let embed = serde_json::to_value(missing_permissions_embed(&["embed_links", "add_reactions"]))
            .unwrap();
        let description = embed["description"].as_str().unwrap();
        assert!(description.contains("`embed_links`, `add_reactions`"));
    }

    #[test]
    fn test_finished_embed_reports_outcome() {
        let embed = serde_json::to_value(init_finished_embed(&InitOutcome::Updated {
            added: vec!["welcome.enabled".to_string()],
        }))
        .unwrap();
        let field = embed["fields"][0]["value"].as_str().unwrap();
        assert!(field.contains("updated with missing keys"));
        assert!(field.contains("`welcome.enabled`"));
    }

    #[test]
    fn test_edit_modal_caps_inputs() {
        let cfg = config(json!({
            "a": 1, "b": 2, "c": 3, "d": 4, "e": 5, "f": 6,
            "level": { "xp": 0 }
        }));
        let modal = serde_json::to_value(edit_modal("edit_config_modal_1", &cfg).unwrap()).unwrap();

        assert_eq!(modal["custom_id"], "edit_config_modal_1");
        assert_eq!(modal["components"].as_array().unwrap().len(), MAX_MODAL_INPUTS);
    }

    #[test]
    fn test_edit_modal_skips_blank_and_colliding_ids() {
        let shared = "k".repeat(CUSTOM_ID_LIMIT);
        let mut map = serde_json::Map::new();
        map.insert(String::new(), json!("blank"));
        map.insert(format!("{shared}_first"), json!(1));
        map.insert(format!("{shared}_second"), json!(2));
        map.insert("prefix".to_string(), json!("!"));
        let cfg = GuildConfig::new(map);
        let modal = serde_json::to_value(edit_modal("edit_config_modal_1", &cfg).unwrap()).unwrap();

        let inputs: Vec<&Value> = modal["components"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| &row["components"][0])
            .collect();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0]["value"], "1");
        assert_eq!(inputs[1]["custom_id"], "prefix");
        assert!(inputs.iter().all(|input| !input["label"].as_str().unwrap().is_empty()));
    }

    #[test]
    fn test_edit_modal_empty_config() {
        let cfg = config(json!({ "level": { "xp": 0 } }));
        assert!(edit_modal("edit_config_modal_1", &cfg).is_none());
    }

    #[test]
    fn test_submitted_values() {
        let rows: Vec<serenity::ActionRow> = serde_json::from_value(json!([
            { "type": 1, "components": [{ "type": 4, "style": 1, "label": "prefix", "custom_id": "prefix", "value": "?" }] },
            { "type": 1, "components": [{ "type": 4, "style": 1, "label": "welcome.enabled", "custom_id": "welcome.enabled" }] }
        ]))
        .unwrap();

        assert_eq!(
            submitted_values(&rows),
            vec![
                ("prefix".to_string(), "?".to_string()),
                ("welcome.enabled".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_submission_ack() {
        let ack = submission_ack(&[("prefix".to_string(), "?".to_string())]);
        assert_eq!(ack, "`prefix` updated to `?`");
        assert_eq!(submission_ack(&[]), "No values were submitted.");
    }
}
