//! Table output formatting

use tabled::{
    Table, Tabled,
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Columns, object::Rows},
};

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// Two-column label/value table for a single record.
///
/// Rows with an empty value are left out.
pub fn format_fields(fields: &[(&str, String)]) -> String {
    let mut builder = Builder::default();
    for (label, value) in fields.iter().filter(|(_, v)| !v.is_empty()) {
        builder.push_record([label.to_string(), value.clone()]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()));
    table.to_string()
}
