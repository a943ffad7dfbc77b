use super::open;
use crate::output::{print_json, print_table};
use clap::Subcommand;
use route_core::config::WarnLevel;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective config as YAML
    Show,
    /// Check the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    match subcmd {
        ConfigSubcommand::Show => {
            if json {
                print_json(&ws.config)
            } else {
                print!("{}", serde_yaml::to_string(&ws.config)?);
                Ok(())
            }
        }
        ConfigSubcommand::Validate => {
            let warnings = ws.config.validate();
            let errors = warnings.iter().filter(|w| w.level == WarnLevel::Error).count();
            if json {
                print_json(&serde_json::json!({ "ok": errors == 0, "warnings": warnings }))?;
            } else if warnings.is_empty() {
                println!("Config OK");
            } else {
                let rows = warnings
                    .iter()
                    .map(|w| {
                        let level = match w.level {
                            WarnLevel::Error => "error",
                            WarnLevel::Warning => "warning",
                        };
                        vec![level.to_string(), w.message.clone()]
                    })
                    .collect();
                print_table(&["LEVEL", "MESSAGE"], rows);
            }
            if errors > 0 {
                anyhow::bail!("config has {errors} error(s)");
            }
            Ok(())
        }
    }
}
