//! Table rendering for history and operation listings.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use calc_core::{CalculationRecord, OperationRegistry};

/// Renders records as a numbered table. `offset` is the 1-based index of the
/// first record within the full history.
pub fn history_table(
    records: &[CalculationRecord],
    offset: usize,
    registry: &OperationRegistry,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Operation"),
        header_cell("A"),
        header_cell("Symbol"),
        header_cell("B"),
        header_cell("Result"),
        header_cell("Timestamp"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for (index, record) in records.iter().enumerate() {
        let symbol = registry
            .resolve(&record.operator)
            .map(|op| op.symbol().to_string())
            .unwrap_or_else(|_| "?".to_string());
        table.add_row(vec![
            dim_cell(offset + index),
            Cell::new(&record.operator),
            Cell::new(record.operand_a),
            Cell::new(symbol),
            Cell::new(record.operand_b),
            Cell::new(record.result)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            dim_cell(record.timestamp.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    table
}

/// Renders every registered operation with its symbol and description.
pub fn operations_table(registry: &OperationRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Token"),
        header_cell("Symbol"),
        header_cell("Name"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for (token, operation) in registry.iter() {
        table.add_row(vec![
            Cell::new(token).fg(Color::Cyan),
            Cell::new(operation.symbol()),
            Cell::new(operation.name()),
            Cell::new(operation.description()),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
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
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
