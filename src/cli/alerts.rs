use super::ui;
use crate::core::alert::{self, PreviousPrice};
use crate::core::config::Subscription;
use crate::core::quote::CommodityQuote;
use crate::notify::ChannelSet;
use anyhow::Result;
use chrono::NaiveDate;

/// Evaluates subscriptions against the prior day's snapshot and dispatches
/// fired alerts. With `dry_run` the alerts are printed but nothing is sent.
pub async fn run(
    quotes: &[CommodityQuote],
    subscriptions: &[Subscription],
    lookup: &dyn PreviousPrice,
    channels: &ChannelSet,
    today: NaiveDate,
    dry_run: bool,
) -> Result<()> {
    println!("{}", ui::style_text("Price Alerts", ui::StyleType::Title));

    if subscriptions.is_empty() {
        println!("No subscriptions configured.");
        return Ok(());
    }

    let fired = alert::evaluate_subscriptions(quotes, subscriptions, lookup, today);
    if fired.is_empty() {
        println!("No alerts fired for {}.", today);
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Category"),
        ui::header_cell("Previous"),
        ui::header_cell("Current"),
        ui::header_cell("Change %"),
        ui::header_cell("Threshold %"),
    ]);
    for (subscription, alert) in &fired {
        table.add_row(vec![
            comfy_table::Cell::new(&alert.name),
            comfy_table::Cell::new(&alert.category),
            ui::number_cell(alert.previous_price),
            ui::number_cell(alert.current_price),
            ui::change_cell(alert.percent_change),
            ui::number_cell(subscription.min_percent_change),
        ]);
    }
    println!("{table}");

    if dry_run {
        println!("Dry run: {} alert(s) not sent.", fired.len());
        return Ok(());
    }

    let mut sent = 0;
    for (subscription, alert) in &fired {
        sent += channels.dispatch(subscription, alert).await;
    }
    println!("Total notifications sent: {sent}");

    Ok(())
}
