use super::open;
use crate::output::print_json;
use clap::Subcommand;
use route_core::entities::profile;
use std::path::Path;

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// Print the display name
    Show,
    /// Change the display name
    Set {
        #[arg(required = true)]
        name: Vec<String>,
    },
}

pub fn run(root: &Path, subcmd: ProfileSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let name = match subcmd {
        ProfileSubcommand::Show => profile::user_name(&ws.store)?,
        ProfileSubcommand::Set { name } => profile::set_user_name(&ws.store, &name.join(" "))?,
    };
    if json {
        print_json(&serde_json::json!({ "name": name }))
    } else {
        println!("{name}");
        Ok(())
    }
}
