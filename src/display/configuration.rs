use crate::security::configuration::SecurityConfiguration;
use crate::utils::formatting;
use comfy_table::{Attribute, Cell};

pub fn print_configuration_list(configurations: &[SecurityConfiguration]) {
    if configurations.is_empty() {
        crate::display::ui::info("No code security configurations found.");
        return;
    }

    let headers = vec!["Name", "ID", "Target", "Enforcement", "Description"];
    let rows = configurations
        .iter()
        .map(|c| {
            vec![
                Cell::new(&c.name).add_attribute(Attribute::Bold),
                Cell::new(c.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())),
                Cell::new(c.target_type.as_deref().unwrap_or("-")),
                Cell::new(c.enforcement.as_deref().unwrap_or("-")),
                Cell::new(c.description.as_deref().unwrap_or("")),
            ]
        })
        .collect();

    formatting::print_table(headers, rows);
}
