use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{cell}{}", " ".repeat(width.saturating_sub(len)))
}

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| println!("{}", cells.join("  ").trim_end());
    line(headers.iter().zip(&widths).map(|(h, &w)| pad(h, w)).collect());
    line(widths.iter().map(|&w| "-".repeat(w)).collect());
    for row in &rows {
        line(row.iter().zip(&widths).map(|(c, &w)| pad(c, w)).collect());
    }
}

/// Print `empty` instead of a table with no rows.
pub fn print_rows(headers: &[&str], rows: Vec<Vec<String>>, empty: &str) {
    if rows.is_empty() {
        println!("{empty}");
    } else {
        print_table(headers, rows);
    }
}
