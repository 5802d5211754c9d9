use comfy_table::presets::UTF8_FULL;
use comfy_table::*;

pub fn format_table(headers: Vec<&str>, rows: Vec<Vec<Cell>>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);

    for row in rows {
        table.add_row(row);
    }

    table
}

pub fn print_table(headers: Vec<&str>, rows: Vec<Vec<Cell>>) {
    println!("{}", format_table(headers, rows));
}

pub fn print_key_value_table(data: Vec<(&str, String)>) {
    let rows = data
        .into_iter()
        .map(|(key, value)| vec![Cell::new(key).add_attribute(Attribute::Bold), Cell::new(value)])
        .collect();
    let mut table = format_table(vec!["Key", "Value"], rows);
    table.set_width(80);
    println!("{}", table);
}

/// Colored cell for a GitHub feature status such as "enabled".
pub fn status_cell(status: Option<&str>) -> Cell {
    match status {
        Some("enabled") => Cell::new("enabled").fg(Color::Green),
        Some("disabled") => Cell::new("disabled").fg(Color::Red),
        Some(other) => Cell::new(other).fg(Color::Yellow),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}
