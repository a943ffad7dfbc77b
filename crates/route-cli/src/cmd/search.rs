use super::open;
use crate::output::{print_json, print_rows};
use route_core::palette;
use std::path::Path;

pub fn run(root: &Path, query: &str, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let items = palette::search(&palette::collect(&ws.store)?, query);
    if json {
        return print_json(&items);
    }
    let rows = items
        .iter()
        .map(|i| {
            vec![
                i.category.to_string(),
                i.id.clone(),
                i.title.clone(),
                i.subtitle.clone(),
            ]
        })
        .collect();
    print_rows(&["CATEGORY", "ID", "TITLE", "DETAIL"], rows, "No matches.");
    Ok(())
}
