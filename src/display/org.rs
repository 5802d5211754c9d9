use crate::commands::org::{AccessReport, ProbeStatus};
use crate::display::ui;
use crate::utils::formatting::{self, status_cell};
use comfy_table::{Attribute, Cell, Color};

fn probe_cell(status: ProbeStatus) -> Cell {
    match status {
        ProbeStatus::Configured => Cell::new("available").fg(Color::Green),
        ProbeStatus::NotConfigured => Cell::new("not configured").fg(Color::Yellow),
        ProbeStatus::Unavailable => Cell::new("denied/error").fg(Color::Red),
    }
}

pub fn print_access_report(report: &AccessReport) {
    formatting::print_key_value_table(vec![
        ("User", report.user.login.clone()),
        ("ID", report.user.id.to_string()),
        ("Organizations", report.organizations.len().to_string()),
    ]);

    if report.organizations.is_empty() {
        ui::warning("No organizations visible to this token.");
        return;
    }

    for org in &report.organizations {
        println!();
        let membership = org
            .membership
            .as_ref()
            .map(|m| format!("{} ({})", m.role, m.state))
            .unwrap_or_else(|| "unknown".to_string());
        let repos = org
            .repository_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        ui::info(&format!(
            "Organization {}: membership {}, {} repositories",
            org.login, membership, repos
        ));

        if let Some(error) = &org.error {
            ui::error(&format!("Failed to list repositories: {}", error));
            continue;
        }
        if org.repositories.is_empty() {
            continue;
        }

        let headers = vec![
            "Repository",
            "Advanced Security",
            "Secret Scanning",
            "Push Protection",
            "Dependabot Updates",
            "Code Scanning Alerts",
            "Dependabot Alerts",
        ];
        let rows = org
            .repositories
            .iter()
            .map(|r| {
                let name = Cell::new(&r.name).add_attribute(Attribute::Bold);
                if r.error.is_some() {
                    let mut row = vec![name, Cell::new("access denied or error").fg(Color::Red)];
                    row.extend((0..5).map(|_| Cell::new("")));
                    return row;
                }
                vec![
                    name,
                    status_cell(r.advanced_security.as_deref()),
                    status_cell(r.secret_scanning.as_deref()),
                    status_cell(r.secret_scanning_push_protection.as_deref()),
                    status_cell(r.dependabot_security_updates.as_deref()),
                    probe_cell(r.code_scanning),
                    probe_cell(r.dependabot_alerts),
                ]
            })
            .collect();
        formatting::print_table(headers, rows);
    }
}
