//! Table walker turning the raw commodities page into normalized quotes.
//!
//! The page is one fixed tabular layout: category header rows (a lone `th`)
//! followed by data rows of ≥8 `td` cells in the order name/unit, price,
//! change, daily %, weekly %, monthly %, yearly %, 3-year %, date. This is
//! not a general HTML table parser.

use crate::core::quote::CommodityQuote;
use crate::core::text::{parse_date, parse_number, parse_percentage};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Labels of the column-legend row; these are never category names.
const COLUMN_LABELS: [&str; 7] = ["Price", "Day", "%", "Week", "Month", "Year", "3Y"];

/// Category tracking threaded through the row walk. Data rows inherit the
/// most recent header row's label.
#[derive(Debug, Clone, PartialEq)]
enum CategoryState {
    NoCategory,
    HasCategory(String),
}

impl CategoryState {
    fn label(&self) -> &str {
        match self {
            CategoryState::NoCategory => "Unknown",
            CategoryState::HasCategory(name) => name,
        }
    }
}

fn selector(css: &str) -> Selector {
    // Selectors here are static strings; parse cannot fail.
    Selector::parse(css).unwrap()
}

/// Walks every table row of the page and returns the quotes in source row
/// order. Malformed rows are dropped individually; an unusable page yields
/// an empty vector, not an error.
pub fn parse_quotes(html: &str, reference_year: i32) -> Vec<CommodityQuote> {
    let document = Html::parse_document(html);
    let row_sel = selector("tr");
    let th_sel = selector("th");
    let td_sel = selector("td");

    let mut quotes = Vec::new();
    let mut state = CategoryState::NoCategory;

    for row in document.select(&row_sel) {
        let header = row.select(&th_sel).next();
        let cells: Vec<ElementRef> = row.select(&td_sel).collect();

        if let Some(header) = header {
            if cells.is_empty() {
                let text = cell_text(&header);
                if !text.is_empty() && !COLUMN_LABELS.contains(&text.as_str()) {
                    debug!("Entering category: {}", text);
                    state = CategoryState::HasCategory(text);
                }
            }
            // A header row with data cells matches neither pattern; skip it.
            continue;
        }

        if cells.len() >= 8 {
            if let Some(quote) = extract_row(&cells, state.label(), reference_year) {
                quotes.push(quote);
            }
        }
    }

    debug!("Parsed {} quotes", quotes.len());
    quotes
}

/// Extracts one quote from a data row's cells, or `None` if the row does
/// not carry the expected structure. Partial quotes are never produced.
fn extract_row(
    cells: &[ElementRef],
    category: &str,
    reference_year: i32,
) -> Option<CommodityQuote> {
    if cells.len() < 8 {
        return None;
    }

    let (name, unit) = split_name_unit(&cells[0]);
    let date_raw = cells.get(8).map(cell_text).unwrap_or_default();

    Some(CommodityQuote {
        category: category.to_string(),
        name,
        unit,
        price: parse_number(&cell_text(&cells[1])),
        change: parse_number(&cell_text(&cells[2])),
        daily_pct: parse_percentage(&cell_text(&cells[3])),
        weekly_pct: parse_percentage(&cell_text(&cells[4])),
        monthly_pct: parse_percentage(&cell_text(&cells[5])),
        yearly_pct: parse_percentage(&cell_text(&cells[6])),
        three_year_pct: parse_percentage(&cell_text(&cells[7])),
        date: parse_date(&date_raw, reference_year),
    })
}

/// Splits the first cell into commodity name and unit.
///
/// The cell carries them either as two separately-tagged text fragments
/// (name first, unit second) or as one fragment where the unit is the token
/// after the last space.
fn split_name_unit(cell: &ElementRef) -> (String, String) {
    let fragments: Vec<&str> = cell
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    match fragments.as_slice() {
        [] => (String::new(), String::new()),
        [single] => match single.rsplit_once(' ') {
            Some((name, unit)) => (name.to_string(), unit.to_string()),
            None => (single.to_string(), String::new()),
        },
        [name, unit, ..] => (name.to_string(), unit.to_string()),
    }
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("")
}
