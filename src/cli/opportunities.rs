use super::ui;
use crate::core::quote::{CommodityQuote, Period, RankedQuote};
use crate::core::ranking;
use anyhow::Result;

/// Prints the per-category investment candidates for each timeframe.
pub fn run(quotes: &[CommodityQuote]) -> Result<()> {
    println!(
        "{}",
        ui::style_text("Investment Opportunities", ui::StyleType::Title)
    );

    let opportunities = ranking::investment_opportunities(quotes);

    display_bucket(
        "Short-term (daily momentum, weekly confirmation)",
        &opportunities.short_term,
        [Period::Daily, Period::Weekly],
    );
    ui::print_separator();
    display_bucket(
        "Mid-term (weekly momentum, monthly confirmation)",
        &opportunities.mid_term,
        [Period::Weekly, Period::Monthly],
    );
    ui::print_separator();
    display_bucket(
        "Long-term (yearly trend, monthly confirmation)",
        &opportunities.long_term,
        [Period::Monthly, Period::Yearly],
    );

    Ok(())
}

fn display_bucket(title: &str, bucket: &[RankedQuote], periods: [Period; 2]) {
    println!("\n{}", ui::style_text(title, ui::StyleType::Subtle));

    if bucket.is_empty() {
        println!("No opportunities found.");
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Rank"),
        ui::header_cell("Cat Rank"),
        ui::header_cell("Category"),
        ui::header_cell("Name"),
        ui::header_cell("Unit"),
        ui::header_cell("Price"),
        ui::header_cell(&periods[0].to_string()),
        ui::header_cell(&periods[1].to_string()),
        ui::header_cell("Date"),
    ]);

    for entry in bucket {
        table.add_row(vec![
            ui::rank_cell(entry.rank),
            ui::rank_cell(entry.rank_in_category),
            comfy_table::Cell::new(&entry.quote.category),
            comfy_table::Cell::new(&entry.quote.name),
            comfy_table::Cell::new(&entry.quote.unit),
            ui::number_cell(entry.quote.price),
            ui::change_cell(periods[0].pct_of(&entry.quote)),
            ui::change_cell(periods[1].pct_of(&entry.quote)),
            comfy_table::Cell::new(&entry.quote.date),
        ]);
    }

    println!("{table}");
}
