//! Organization display models

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::client::models::{ContactKind, Organization, Participant};
use crate::output::formatters::{format_date, truncate};

/// One search result row for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct OrganizationRow {
    /// Position on the current page, used by `--save` and the browser
    #[tabled(rename = "#")]
    pub index: usize,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "LEGAL FORM")]
    pub legal_form: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "LOCATION")]
    pub location: String,

    #[tabled(rename = "REGISTER")]
    pub register: String,

    #[tabled(skip)]
    pub id: String,
}

impl OrganizationRow {
    pub fn new(index: usize, org: &Organization) -> Self {
        Self {
            index,
            name: truncate(&org.display_name(), 48),
            legal_form: org.legal_form().unwrap_or_else(|| "--".to_string()),
            status: org.status_label().to_string(),
            location: org.location(),
            register: register_label(org),
            id: org.fingerprint(),
        }
    }

    /// Rows for a page, numbered from 1
    pub fn page(orgs: &[Organization]) -> Vec<Self> {
        orgs.iter()
            .enumerate()
            .map(|(i, org)| Self::new(i + 1, org))
            .collect()
    }
}

/// `HRB 123456 (Berlin)` style register reference
fn register_label(org: &Organization) -> String {
    let number = [org.register_type(), org.register_number()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    match (number.is_empty(), org.register_court()) {
        (true, _) => "--".to_string(),
        (false, Some(court)) => format!("{} ({})", number, court),
        (false, None) => number,
    }
}

fn contact_label(kind: ContactKind) -> &'static str {
    match kind {
        ContactKind::Phone => "Phone",
        ContactKind::Fax => "Fax",
        ContactKind::Email => "Email",
        ContactKind::Website => "Website",
    }
}

/// Compact multi-line card for the `pretty` result list.
pub fn render_card(index: usize, org: &Organization) -> String {
    let status = if org.is_active() {
        org.status_label().green()
    } else {
        org.status_label().red()
    };

    let mut lines = vec![format!(
        "{:>3}. {}  {}",
        index,
        org.display_name().bold(),
        status
    )];

    let mut facts = Vec::new();
    if let Some(form) = org.legal_form() {
        facts.push(form);
    }
    facts.push(org.location());
    let register = register_label(org);
    if register != "--" {
        facts.push(register);
    }
    lines.push(format!("     {}", facts.join(" · ").dimmed()));

    if let Some(description) = org.description() {
        lines.push(format!("     {}", truncate(&description, 100)));
    }

    lines.join("\n")
}

/// Full detail view for a single organization.
pub fn render_details(org: &Organization) -> String {
    let mut out = Vec::new();

    out.push(format!("{}", org.display_name().bold()));
    out.push(format!("{}: {}", "ID".dimmed(), org.fingerprint()));
    out.push(String::new());

    let fields = [
        ("Legal form", org.legal_form()),
        ("Status", Some(org.status_label().to_string())),
        ("Register", Some(register_label(org)).filter(|r| r != "--")),
        ("Jurisdiction", org.jurisdiction()),
        ("Location", Some(org.location())),
        ("Founded", org.date_founded().map(|d| format_date(Some(&d)))),
        ("Registered", org.registered_on().map(|d| format_date(Some(&d)))),
        ("Last updated", org.last_updated().map(|d| format_date(Some(&d)))),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            out.push(format!("  {:<13} {}", format!("{}:", label).dimmed(), value));
        }
    }

    if let Some(description) = org.description() {
        out.push(String::new());
        out.push(format!("{}", "Purpose".bold()));
        out.push(format!("  {}", description));
    }

    let addresses = org.addresses();
    if !addresses.is_empty() {
        out.push(String::new());
        out.push(format!("{}", "Addresses".bold()));
        out.extend(addresses.iter().map(|a| format!("  • {}", a)));
    }

    let capital = org.capital();
    if !capital.is_empty() {
        out.push(String::new());
        out.push(format!("{}", "Capital".bold()));
        out.extend(capital.iter().map(|c| format!("  • {}", c)));
    }

    let contacts = org.contacts();
    if !contacts.is_empty() {
        out.push(String::new());
        out.push(format!("{}", "Contact".bold()));
        out.extend(
            contacts
                .iter()
                .map(|c| format!("  {:<8} {}", contact_label(c.kind), c.value)),
        );
    }

    let participants = org.participants();
    out.push(String::new());
    out.push(format!(
        "{} ({})",
        "Participants".bold(),
        participants.len().to_string().cyan()
    ));
    if participants.is_empty() {
        out.push(format!("  {}", "(none)".dimmed()));
    } else {
        out.extend(participants.iter().map(render_participant));
    }

    out.join("\n")
}

fn render_participant(p: &Participant) -> String {
    let mut line = format!("  • {} [{}]", p.name, p.roles.dimmed());

    let born = p
        .birth_date
        .as_deref()
        .map(|d| format_date(Some(d)))
        .or_else(|| p.birth_year.clone());
    if let Some(born) = born {
        line.push_str(&format!(", born {}", born));
    }
    if let Some(city) = &p.city {
        line.push_str(&format!(", {}", city));
    }
    for contact in &p.contacts {
        line.push_str(&format!(
            "\n      {:<8} {}",
            contact_label(contact.kind),
            contact.value
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example() -> Organization {
        Organization::new(json!({
            "id": "org-1",
            "name": "Example GmbH",
            "legal_form": "GmbH",
            "status": "aktiv",
            "register_type": "HRB",
            "register_number": "123456",
            "register_court": "Berlin",
            "seat": { "city": "Berlin", "zip_code": "10115" },
            "date_founded": "2019-03-07",
            "description": "Software development",
            "participations": [
                {
                    "participant": {
                        "name": { "first_name": "Erika", "last_name": "Mustermann" },
                        "birth_year": 1965,
                        "seat": { "city": "Potsdam" }
                    },
                    "roles": [{ "name": "Geschäftsführer" }]
                }
            ]
        }))
    }

    #[test]
    fn test_row_from_organization() {
        let row = OrganizationRow::new(3, &example());

        assert_eq!(row.index, 3);
        assert_eq!(row.name, "Example GmbH");
        assert_eq!(row.legal_form, "GmbH");
        assert_eq!(row.status, "Active");
        assert_eq!(row.location, "Berlin, 10115");
        assert_eq!(row.register, "HRB 123456 (Berlin)");
        assert_eq!(row.id, "org-1");
    }

    #[test]
    fn test_row_placeholders_for_sparse_record() {
        let row = OrganizationRow::new(1, &Organization::new(json!({ "name": "Bare" })));

        assert_eq!(row.legal_form, "--");
        assert_eq!(row.status, "Inactive");
        assert_eq!(row.register, "--");
    }

    #[test]
    fn test_page_rows_numbered_from_one() {
        let orgs = vec![example(), example()];
        let rows = OrganizationRow::page(&orgs);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[1].index, 2);
    }

    #[test]
    fn test_card_contents() {
        let card = render_card(1, &example());
        assert!(card.contains("Example GmbH"));
        assert!(card.contains("Active"));
        assert!(card.contains("HRB 123456 (Berlin)"));
        assert!(card.contains("Software development"));
    }

    #[test]
    fn test_details_contents() {
        let details = render_details(&example());
        assert!(details.contains("07.03.2019"));
        assert!(details.contains("Erika Mustermann"));
        assert!(details.contains("Geschäftsführer"));
        assert!(details.contains("born 1965"));
        assert!(details.contains("Potsdam"));
    }
}
