use super::ui;
use crate::core::quote::CommodityQuote;
use crate::core::ranking;
use anyhow::{Context, Result};
use std::path::Path;

const CSV_HEADER: &str = "Category,Name,Unit,Price,Change,Daily %,Weekly %,Monthly %,Yearly %,3-Year %,Date";

/// Prints the full normalized quote table and optionally exports it as CSV.
pub fn run(quotes: &[CommodityQuote], export: Option<&Path>) -> Result<()> {
    println!(
        "{}",
        ui::style_text("Commodity Quotes", ui::StyleType::Title)
    );
    println!(
        "{}",
        ui::style_text(
            &format!(
                "{} commodities across {} categories",
                quotes.len(),
                ranking::categories(quotes).len()
            ),
            ui::StyleType::Subtle
        )
    );

    display_quotes(quotes);

    if let Some(path) = export {
        export_csv(quotes, path)?;
        println!("Data exported to {}", path.display());
    }

    Ok(())
}

fn display_quotes(quotes: &[CommodityQuote]) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell("Name"),
        ui::header_cell("Unit"),
        ui::header_cell("Price"),
        ui::header_cell("Change"),
        ui::header_cell("Daily %"),
        ui::header_cell("Weekly %"),
        ui::header_cell("Monthly %"),
        ui::header_cell("Yearly %"),
        ui::header_cell("3-Year %"),
        ui::header_cell("Date"),
    ]);

    for quote in quotes {
        table.add_row(vec![
            comfy_table::Cell::new(&quote.category),
            comfy_table::Cell::new(&quote.name),
            comfy_table::Cell::new(&quote.unit),
            ui::number_cell(quote.price),
            ui::number_cell(quote.change),
            ui::change_cell(quote.daily_pct),
            ui::change_cell(quote.weekly_pct),
            ui::change_cell(quote.monthly_pct),
            ui::change_cell(quote.yearly_pct),
            ui::change_cell(quote.three_year_pct),
            comfy_table::Cell::new(&quote.date),
        ]);
    }

    println!("{table}");
}

/// Writes the quote table as CSV. Serialization lives here at the CLI
/// boundary; the core only hands over records.
fn export_csv(quotes: &[CommodityQuote], path: &Path) -> Result<()> {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for quote in quotes {
        let fields = [
            csv_escape(&quote.category),
            csv_escape(&quote.name),
            csv_escape(&quote.unit),
            quote.price.to_string(),
            quote.change.to_string(),
            quote.daily_pct.to_string(),
            quote.weekly_pct.to_string(),
            quote.monthly_pct.to_string(),
            quote.yearly_pct.to_string(),
            quote.three_year_pct.to_string(),
            csv_escape(&quote.date),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    std::fs::write(path, out)
        .with_context(|| format!("Failed to write CSV to {}", path.display()))
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
