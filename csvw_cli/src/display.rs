use comfy_table::{presets::NOTHING, *};
use csvw::column::Column;

fn column_table(columns: &[Column]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Position").add_attribute(Attribute::Bold),
            Cell::new("Role").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("@id").add_attribute(Attribute::Bold),
        ])
        .set_style(comfy_table::TableComponent::BottomBorder, '─')
        .set_style(comfy_table::TableComponent::MiddleHeaderIntersections, '─')
        .set_style(comfy_table::TableComponent::HeaderLines, '─')
        .set_style(comfy_table::TableComponent::BottomBorderIntersections, '─')
        .set_style(comfy_table::TableComponent::TopBorder, '─')
        .set_style(comfy_table::TableComponent::TopBorderIntersections, '─');
    for column in columns {
        table.add_row(vec![
            column
                .position()
                .map(|position| position.to_string())
                .unwrap_or_default(),
            column.role().to_string(),
            column.name().unwrap_or_default().to_string(),
            column.title().unwrap_or_default().to_string(),
            column.id().to_string(),
        ]);
    }
    if let Some(position) = table.column_mut(0) {
        position.set_cell_alignment(CellAlignment::Right);
    }
    table
}

pub fn display_columns(columns: &[Column]) -> anyhow::Result<()> {
    println!("\n{}", column_table(columns));
    Ok(())
}
