use crate::output::print_json;
use anyhow::Context;
use route_core::{paths, Workspace};
use std::path::Path;

pub fn run(root: &Path, name: Option<&str>, json: bool) -> anyhow::Result<()> {
    let name = name.map(str::to_string).unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "route".to_string())
    });

    let (ws, report) = Workspace::init(root, &name)
        .with_context(|| format!("failed to initialize {}", root.display()))?;

    if json {
        return print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "backend": ws.store.backend_name(),
            "config_created": report.config_created,
            "seeded": report.seeded,
        }));
    }

    println!("Initializing Founder's Route in: {}", root.display());
    if report.config_created {
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }
    for key in &report.seeded {
        println!("  seeded:  {key}");
    }
    println!("Storage backend: {}", ws.store.backend_name());
    Ok(())
}
