use super::open;
use crate::output::print_json;
use route_core::access::{self, AccessGrant};
use std::path::Path;

pub fn run(root: &Path, code: &str, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let grant = access::check(&ws.config.access, code)?;
    if json {
        return print_json(&serde_json::json!({
            "grant": grant,
            "granted": grant.is_granted(),
        }));
    }
    match grant {
        AccessGrant::Founder => println!("Founder code accepted: Founder plan unlocked"),
        AccessGrant::Registration => println!("Invite code accepted: registration unlocked"),
        AccessGrant::Denied => anyhow::bail!("access code not recognized"),
    }
    Ok(())
}
