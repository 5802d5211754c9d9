use crate::api::models::Repository;
use crate::utils::formatting;
use comfy_table::{Attribute, Cell, Color};

pub fn print_repo_list(repos: &[Repository]) {
    if repos.is_empty() {
        crate::display::ui::info("No repositories found.");
        return;
    }

    let headers = vec!["Name", "ID", "Visibility", "Archived"];
    let rows: Vec<Vec<Cell>> = repos
        .iter()
        .map(|r| {
            vec![
                Cell::new(&r.name).add_attribute(Attribute::Bold),
                Cell::new(r.id),
                Cell::new(if r.private { "Private" } else { "Public" }).fg(if r.private {
                    Color::Yellow
                } else {
                    Color::Cyan
                }),
                Cell::new(if r.archived { "yes" } else { "no" }),
            ]
        })
        .collect();

    crate::display::ui::info(&format!("Found {} repositories:", repos.len()));
    formatting::print_table(headers, rows);
}
