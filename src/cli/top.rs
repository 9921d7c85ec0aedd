use super::ui;
use crate::core::quote::{CommodityQuote, Period};
use crate::core::ranking;
use anyhow::Result;

/// Prints the top performers for one metric, per category by default or as
/// a single global list.
pub fn run(quotes: &[CommodityQuote], metric: Period, count: usize, global: bool) -> Result<()> {
    let (title, top) = if global {
        (
            format!("Top {count} by {metric}"),
            ranking::top_by_metric(quotes, metric, count),
        )
    } else {
        (
            format!("Top {count} by {metric} per category"),
            ranking::top_by_category(quotes, metric, count),
        )
    };

    println!("{}", ui::style_text(&title, ui::StyleType::Title));

    if top.is_empty() {
        println!("No quotes to rank.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell("Name"),
        ui::header_cell("Unit"),
        ui::header_cell("Price"),
        ui::header_cell("Change"),
        ui::header_cell(&metric.to_string()),
        ui::header_cell("Date"),
    ]);

    for quote in &top {
        table.add_row(vec![
            comfy_table::Cell::new(&quote.category),
            comfy_table::Cell::new(&quote.name),
            comfy_table::Cell::new(&quote.unit),
            ui::number_cell(quote.price),
            ui::number_cell(quote.change),
            ui::change_cell(metric.pct_of(quote)),
            comfy_table::Cell::new(&quote.date),
        ]);
    }

    println!("{table}");
    Ok(())
}
