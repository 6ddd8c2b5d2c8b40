//! Organization records returned by the registry
//!
//! The registry does not commit to a fixed schema: names may be plain strings
//! or name-part objects, contact data may live in `phone_infos` or in direct
//! fields, and participants come either as `participations` or as a flat
//! `participants` list. The record is kept as raw JSON and display fields are
//! derived on demand.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// One batch of search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultBatch {
    #[serde(default)]
    pub results: Vec<Organization>,

    /// Total matches reported by the server
    #[serde(default)]
    pub total: usize,
}

/// A company or entity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Organization(pub Value);

/// Kind of contact entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContactKind {
    Phone,
    Fax,
    Email,
    Website,
}

/// A single contact entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub kind: ContactKind,
    pub value: String,
}

/// A person or entity participating in an organization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub name: String,
    pub roles: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<Contact>,
}

/// Read a field as text, accepting strings and numbers.
fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Format a name that is either a string or a name-parts object.
pub fn format_name(name: Option<&Value>) -> String {
    match name {
        Some(Value::String(s)) => s.clone(),
        Some(parts @ Value::Object(_)) => {
            let mut out: Vec<String> = Vec::new();
            for key in ["title", "prefix", "first_name", "last_name"] {
                if let Some(part) = text(parts, key) {
                    out.push(part);
                }
            }

            if let Some(birth_name) = text(parts, "birth_name")
                && text(parts, "last_name").as_deref() != Some(birth_name.as_str())
            {
                out.push(format!("(née {})", birth_name));
            }

            match parts.get("other_names") {
                Some(Value::String(s)) if !s.is_empty() => out.push(s.clone()),
                Some(Value::Array(names)) => {
                    let joined = names
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(" ");
                    if !joined.is_empty() {
                        out.push(joined);
                    }
                }
                _ => {}
            }

            if let Some(extra) = text(parts, "extra") {
                out.push(extra);
            }

            if out.is_empty() {
                "Unknown".to_string()
            } else {
                out.join(" ")
            }
        }
        _ => "Unknown".to_string(),
    }
}

/// Collect contacts from `phone_infos`, then fall back to direct fields.
fn collect_contacts(record: &Value, email_keys: &[&str], website_keys: &[&str]) -> Vec<Contact> {
    let mut contacts = Vec::new();

    if let Some(infos) = record.get("phone_infos").and_then(Value::as_array) {
        for info in infos {
            let kind = match info.get("phone_type").and_then(Value::as_str) {
                Some("Telefon") => ContactKind::Phone,
                Some("Fax") => ContactKind::Fax,
                Some("E-Mail") => ContactKind::Email,
                _ => continue,
            };
            if let Some(value) = text(info, "phone_number") {
                contacts.push(Contact { kind, value });
            }
        }
    }

    let has = |contacts: &[Contact], kind: ContactKind| contacts.iter().any(|c| c.kind == kind);

    if !has(&contacts, ContactKind::Email)
        && let Some(value) = email_keys.iter().find_map(|k| text(record, k))
    {
        contacts.push(Contact {
            kind: ContactKind::Email,
            value,
        });
    }
    if !has(&contacts, ContactKind::Phone)
        && let Some(value) = text(record, "phone").or_else(|| text(record, "telephone"))
    {
        contacts.push(Contact {
            kind: ContactKind::Phone,
            value,
        });
    }
    if !has(&contacts, ContactKind::Fax)
        && let Some(value) = text(record, "fax")
    {
        contacts.push(Contact {
            kind: ContactKind::Fax,
            value,
        });
    }
    if let Some(value) = website_keys.iter().find_map(|k| text(record, k)) {
        contacts.push(Contact {
            kind: ContactKind::Website,
            value,
        });
    }

    contacts
}

fn city_of(record: &Value) -> Option<String> {
    record
        .get("seat")
        .and_then(|seat| text(seat, "city"))
        .or_else(|| {
            record
                .get("addresses")
                .and_then(Value::as_array)
                .and_then(|a| a.first())
                .and_then(|addr| text(addr, "city"))
        })
}

impl Organization {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn display_name(&self) -> String {
        format_name(self.0.get("name"))
    }

    pub fn legal_form(&self) -> Option<String> {
        text(&self.0, "legal_form")
    }

    pub fn status(&self) -> Option<String> {
        text(&self.0, "status")
    }

    pub fn is_active(&self) -> bool {
        self.status().as_deref() == Some("aktiv")
    }

    /// `Active` or `Inactive`
    pub fn status_label(&self) -> &'static str {
        if self.is_active() { "Active" } else { "Inactive" }
    }

    pub fn register_number(&self) -> Option<String> {
        text(&self.0, "register_number").or_else(|| text(&self.0, "registration_number"))
    }

    pub fn register_type(&self) -> Option<String> {
        text(&self.0, "register_type")
    }

    pub fn register_court(&self) -> Option<String> {
        text(&self.0, "register_court")
    }

    pub fn jurisdiction(&self) -> Option<String> {
        text(&self.0, "jurisdiction")
    }

    pub fn date_founded(&self) -> Option<String> {
        text(&self.0, "date_founded")
    }

    pub fn registered_on(&self) -> Option<String> {
        text(&self.0, "registered_on")
    }

    pub fn last_updated(&self) -> Option<String> {
        text(&self.0, "last_updated")
    }

    pub fn description(&self) -> Option<String> {
        text(&self.0, "description")
    }

    /// City with zip code, from the seat or the first address.
    pub fn location(&self) -> String {
        let from = |place: &Value| {
            text(place, "city").map(|city| match text(place, "zip_code") {
                Some(zip) => format!("{}, {}", city, zip),
                None => city,
            })
        };

        self.0
            .get("seat")
            .and_then(from)
            .or_else(|| {
                self.0
                    .get("addresses")
                    .and_then(Value::as_array)
                    .and_then(|a| a.first())
                    .and_then(from)
            })
            .unwrap_or_else(|| "Location unknown".to_string())
    }

    /// Every address as a single line.
    pub fn addresses(&self) -> Vec<String> {
        self.0
            .get("addresses")
            .and_then(Value::as_array)
            .map(|addresses| {
                addresses
                    .iter()
                    .map(|addr| {
                        let street = [text(addr, "street"), text(addr, "house_number")]
                            .into_iter()
                            .flatten()
                            .collect::<Vec<_>>()
                            .join(" ");
                        let city = [text(addr, "zip_code"), text(addr, "city")]
                            .into_iter()
                            .flatten()
                            .collect::<Vec<_>>()
                            .join(" ");
                        let mut line = [street, city]
                            .into_iter()
                            .filter(|s| !s.is_empty())
                            .collect::<Vec<_>>()
                            .join(", ");
                        if let Some(country) = text(addr, "country_code") {
                            line.push_str(&format!(", {}", country));
                        }
                        line
                    })
                    .filter(|line| !line.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Share capital entries as `amount currency`.
    pub fn capital(&self) -> Vec<String> {
        self.0
            .get("capital")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|c| {
                        let amount = text(c, "amount")?;
                        Some(match text(c, "currency") {
                            Some(currency) => format!("{} {}", amount, currency),
                            None => amount,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn contacts(&self) -> Vec<Contact> {
        collect_contacts(&self.0, &["email"], &["website"])
    }

    pub fn participants(&self) -> Vec<Participant> {
        if let Some(participations) = self.0.get("participations").and_then(Value::as_array) {
            return participations
                .iter()
                .map(|participation| {
                    let empty = Value::Null;
                    let person = participation.get("participant").unwrap_or(&empty);
                    let roles = participation
                        .get("roles")
                        .and_then(Value::as_array)
                        .map(|roles| {
                            roles
                                .iter()
                                .map(|role| format_name(role.get("name")))
                                .filter(|r| !r.is_empty() && r != "Unknown")
                                .collect::<Vec<_>>()
                                .join(", ")
                        })
                        .unwrap_or_default();

                    Participant {
                        name: format_name(person.get("name")),
                        roles: if roles.is_empty() {
                            "No role specified".to_string()
                        } else {
                            roles
                        },
                        birth_year: text(person, "birth_year"),
                        birth_date: text(person, "birth_date"),
                        city: city_of(person),
                        contacts: collect_contacts(person, &["email"], &["website"]),
                    }
                })
                .collect();
        }

        if let Some(participants) = self.0.get("participants").and_then(Value::as_array) {
            return participants
                .iter()
                .map(|person| {
                    let roles = match person.get("role").or_else(|| person.get("roles")) {
                        Some(Value::String(s)) => s.clone(),
                        Some(Value::Array(items)) => items
                            .iter()
                            .filter_map(Value::as_str)
                            .collect::<Vec<_>>()
                            .join(", "),
                        _ => String::new(),
                    };

                    Participant {
                        name: format_name(person.get("name")),
                        roles,
                        birth_year: text(person, "birth_year"),
                        birth_date: text(person, "birth_date"),
                        city: city_of(person),
                        contacts: collect_contacts(
                            person,
                            &["email", "email_address"],
                            &["website", "homepage"],
                        ),
                    }
                })
                .collect();
        }

        Vec::new()
    }

    /// Stable identifier derived from the register entry and name.
    ///
    /// Uses the record's own `id` when present.
    pub fn fingerprint(&self) -> String {
        if let Some(id) = text(&self.0, "id") {
            return id;
        }

        let mut hasher = Sha256::new();
        hasher.update(self.register_court().unwrap_or_default().as_bytes());
        hasher.update(b"|");
        hasher.update(self.register_number().unwrap_or_default().as_bytes());
        hasher.update(b"|");
        hasher.update(self.display_name().as_bytes());

        let digest = format!("{:x}", hasher.finalize());
        digest[..16].to_string()
    }
}
