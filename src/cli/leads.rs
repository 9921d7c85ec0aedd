use super::ui;
use crate::core::quote::{CommodityQuote, LeadRank, StrongLead};
use crate::core::ranking::{self, RankChange};
use crate::store::SnapshotStore;
use anyhow::Result;
use chrono::NaiveDate;

const CHANGE_LIMIT: usize = 10;

/// Prints the strong-leads consensus table: quotes in the top 3 of at least
/// one period within their category, globally ordered by match strength.
/// Today's ranks are persisted as the baseline for the next run; with
/// `changes` the biggest rank movers against the previous day are shown too.
pub fn run(
    quotes: &[CommodityQuote],
    store: &dyn SnapshotStore,
    today: NaiveDate,
    changes: bool,
) -> Result<()> {
    println!(
        "{}",
        ui::style_text("Strong Leads", ui::StyleType::Title)
    );

    let leads = ranking::strong_leads(quotes);
    if leads.is_empty() {
        println!("No strong leads found.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Rank"),
        ui::header_cell("Cat Rank"),
        ui::header_cell("Category"),
        ui::header_cell("Name"),
        ui::header_cell("Unit"),
        ui::header_cell("Price"),
        ui::header_cell("Daily %"),
        ui::header_cell("Weekly %"),
        ui::header_cell("Monthly %"),
        ui::header_cell("Yearly %"),
        ui::header_cell("Match"),
        ui::header_cell("Date"),
    ]);

    for lead in &leads {
        table.add_row(vec![
            ui::rank_cell(lead.rank),
            ui::rank_cell(lead.rank_in_category),
            comfy_table::Cell::new(&lead.quote.category),
            comfy_table::Cell::new(&lead.quote.name),
            comfy_table::Cell::new(&lead.quote.unit),
            ui::number_cell(lead.quote.price),
            ui::change_cell(lead.quote.daily_pct),
            ui::change_cell(lead.quote.weekly_pct),
            ui::change_cell(lead.quote.monthly_pct),
            ui::change_cell(lead.quote.yearly_pct),
            comfy_table::Cell::new(lead.match_label()),
            comfy_table::Cell::new(&lead.quote.date),
        ]);
    }

    println!("{table}");

    let ranks: Vec<LeadRank> = leads.iter().map(LeadRank::from).collect();

    if changes {
        let previous = store.lead_ranks_on(today - chrono::Duration::days(1));
        display_changes(&leads, &previous);
    }

    store.save_lead_ranks(today, &ranks)?;
    Ok(())
}

fn display_changes(leads: &[StrongLead], previous: &[LeadRank]) {
    ui::print_separator();
    println!(
        "{}",
        ui::style_text("Ranking Changes (vs Previous Day)", ui::StyleType::Subtle)
    );

    if previous.is_empty() {
        println!("No previous data for comparison (first run).");
        return;
    }

    let movers = ranking::rank_changes(leads, previous, CHANGE_LIMIT);
    if movers.is_empty() {
        println!("No ranking changes detected.");
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Category"),
        ui::header_cell("Rank"),
        ui::header_cell("Prev Rank"),
        ui::header_cell("Moved"),
        ui::header_cell("Daily %"),
        ui::header_cell("Weekly %"),
        ui::header_cell("Match"),
    ]);

    for mover in &movers {
        table.add_row(vec![
            comfy_table::Cell::new(&mover.current.quote.name),
            comfy_table::Cell::new(&mover.current.quote.category),
            ui::rank_cell(mover.current.rank),
            ui::rank_cell(mover.previous_rank),
            moved_cell(mover),
            ui::change_cell(mover.current.quote.daily_pct),
            ui::change_cell(mover.current.quote.weekly_pct),
            comfy_table::Cell::new(mover.current.match_label()),
        ]);
    }

    println!("{table}");
}

fn moved_cell(mover: &RankChange) -> comfy_table::Cell {
    let delta = mover.delta();
    let text = format!("{delta:+}");
    if delta > 0 {
        comfy_table::Cell::new(text).fg(comfy_table::Color::Green)
    } else {
        comfy_table::Cell::new(text).fg(comfy_table::Color::Red)
    }
}
