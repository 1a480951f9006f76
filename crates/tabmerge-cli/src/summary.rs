use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabmerge_append::MergeStats;
use tabmerge_map::{Mapping, MappingEntry, MappingStatus};

pub fn print_mapping(mapping: &Mapping) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Target"),
        header_cell("Source"),
        header_cell("Status"),
        header_cell("Suggestions"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for entry in mapping.entries() {
        table.add_row(vec![
            Cell::new(entry.target_column()).add_attribute(Attribute::Bold),
            source_cell(entry),
            status_cell(entry.status()),
            suggestions_cell(entry),
        ]);
    }
    println!("{table}");

    let summary = mapping.summary();
    println!(
        "{} of {} target columns mapped ({} exact, {} manual), {} with suggestions, {} unmapped",
        summary.resolved(),
        summary.total,
        summary.exact,
        summary.manual,
        summary.suggested,
        summary.unmapped,
    );
}

pub fn print_stats(stats: &MergeStats, written: Option<&Path>) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Source columns"), Cell::new(stats.source_columns)]);
    table.add_row(vec![Cell::new("Target columns"), Cell::new(stats.target_columns)]);
    table.add_row(vec![Cell::new("Mapped columns"), Cell::new(stats.mapped_columns)]);
    table.add_row(vec![
        Cell::new("Appended rows").add_attribute(Attribute::Bold),
        Cell::new(stats.appended_rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    match written {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Dry run: nothing written"),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn source_cell(entry: &MappingEntry) -> Cell {
    match entry.chosen_source_column() {
        Some(source) => Cell::new(source),
        None => dim_cell("-"),
    }
}

fn status_cell(status: MappingStatus) -> Cell {
    let color = match status {
        MappingStatus::Exact => Color::Green,
        MappingStatus::ManuallySet => Color::Blue,
        MappingStatus::Suggested => Color::Yellow,
        MappingStatus::Unmapped => Color::Red,
    };
    Cell::new(status.as_str()).fg(color)
}

fn suggestions_cell(entry: &MappingEntry) -> Cell {
    if entry.candidates().is_empty() {
        return dim_cell("-");
    }
    let text = entry
        .candidates()
        .iter()
        .map(|candidate| format!("{} ({})", candidate.name, candidate.score))
        .collect::<Vec<_>>()
        .join(", ");
    Cell::new(text)
}
