use chrono::Utc;
use cmx::core::quote::{LeadRank, Period};
use cmx::core::{ranking, table};
use cmx::store::SnapshotStore;
use cmx::store::disk::DiskSnapshots;
use std::fs;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// One page in the fixed layout: category header rows followed by data
    /// rows with name/unit, price, change, four period columns, 3Y and date.
    pub fn fixture_page() -> String {
        let mut rows = String::from(
            "<table>\
             <tr><th>Price</th><th>Day</th><th>%</th><th>Week</th>\
             <th>Month</th><th>Year</th><th>3Y</th></tr>\
             <tr><th>Energy</th></tr>",
        );
        for (name_unit, price, d, w, m, y) in [
            ("Crude Oil USD/Bbl", "70.50", "1.20", "2.10", "3.00", "5.50"),
            ("Brent USD/Bbl", "75.10", "0.90", "1.80", "2.50", "4.10"),
            ("Natural Gas USD/MMBtu", "2.85", "-0.40", "1.10", "-2.00", "8.00"),
        ] {
            rows.push_str(&data_row(name_unit, price, d, w, m, y));
        }
        rows.push_str("<tr><th>Metals</th></tr>");
        for (name_unit, price, d, w, m, y) in [
            ("Gold USD/t.oz", "2010.00", "0.80", "1.50", "2.20", "12.00"),
            ("Silver USD/t.oz", "24.30", "1.50", "0.70", "1.10", "9.00"),
            ("Lithium CNY/T", "98500.00", "2.40", "5.10", "7.90", "-4.00"),
        ] {
            rows.push_str(&data_row(name_unit, price, d, w, m, y));
        }
        // A structurally broken row that must be dropped, not fatal.
        rows.push_str("<tr><td>Broken</td><td>1.0</td></tr>");
        rows.push_str("</table>");
        rows
    }

    fn data_row(name_unit: &str, price: &str, d: &str, w: &str, m: &str, y: &str) -> String {
        format!(
            "<tr><td>{name_unit}</td><td>{price}</td><td>0.10</td>\
             <td>{d}%</td><td>{w}%</td><td>{m}%</td><td>{y}%</td><td>1.00%</td>\
             <td>Nov/28</td></tr>"
        )
    }

    pub async fn create_page_mock_server(body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/commodities"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }
}

#[test]
fn test_pipeline_from_markup_to_rankings() {
    let page = test_utils::fixture_page();
    let quotes = table::parse_quotes(&page, 2025);

    // Six valid rows; the broken one contributes nothing.
    assert_eq!(quotes.len(), 6);
    assert_eq!(ranking::categories(&quotes), vec!["Energy", "Metals"]);
    assert!(quotes.iter().all(|q| q.date == "2025/11/28"));

    let top_daily = ranking::top_by_category(&quotes, Period::Daily, 1);
    let names: Vec<&str> = top_daily.iter().map(|q| q.name.as_str()).collect();
    assert_eq!(names, vec!["Crude Oil", "Lithium"]);

    // Three quotes per category: every quote is a strong lead with 4/4.
    let leads = ranking::strong_leads(&quotes);
    assert_eq!(leads.len(), 6);
    let ranks: Vec<usize> = leads.iter().map(|l| l.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
    // Lithium leads on the (match count, weekly, monthly) key.
    assert_eq!(leads[0].quote.name, "Lithium");
    assert_eq!(leads[0].match_label(), "4/4 (D,W,M,Y)");

    let opportunities = ranking::investment_opportunities(&quotes);
    // Short-term: daily and weekly both positive, highest daily wins.
    let short: Vec<&str> = opportunities
        .short_term
        .iter()
        .map(|e| e.quote.name.as_str())
        .collect();
    assert_eq!(short, vec!["Crude Oil", "Lithium"]);
    // Natural Gas has the best yearly number but a negative monthly one.
    let long: Vec<&str> = opportunities
        .long_term
        .iter()
        .map(|e| e.quote.name.as_str())
        .collect();
    assert_eq!(long, vec!["Crude Oil", "Gold"]);
}

#[test]
fn test_pipeline_is_reproducible() {
    let page = test_utils::fixture_page();
    let first = table::parse_quotes(&page, 2025);
    let second = table::parse_quotes(&page, 2025);
    assert_eq!(first, second);

    let leads_a: Vec<(usize, String)> = ranking::strong_leads(&first)
        .into_iter()
        .map(|l| (l.rank, l.quote.name))
        .collect();
    let leads_b: Vec<(usize, String)> = ranking::strong_leads(&second)
        .into_iter()
        .map(|l| (l.rank, l.quote.name))
        .collect();
    assert_eq!(leads_a, leads_b);
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock_page() {
    let mock_server = test_utils::create_page_mock_server(&test_utils::fixture_page()).await;
    let data_dir = tempfile::tempdir().expect("Failed to create data dir");

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = format!(
        r#"
source:
  base_url: "{}"
reference_year: 2025
data_path: "{}"
"#,
        mock_server.uri(),
        data_dir.path().display()
    );
    fs::write(config_file.path(), &config_content).expect("Failed to write config file");

    let result = cmx::run_command(
        cmx::AppCommand::Quotes { export: None },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Quotes command failed: {:?}", result.err());

    // The run persisted today's snapshot for tomorrow's alert baseline.
    let store = DiskSnapshots::open(data_dir.path()).unwrap();
    let today = Utc::now().date_naive();
    let stored = store.quote_on("Gold", "Metals", today).unwrap();
    assert_eq!(stored.price, 2010.0);
}

#[test_log::test(tokio::test)]
async fn test_alerts_flow_fires_from_previous_snapshot() {
    let mock_server = test_utils::create_page_mock_server(&test_utils::fixture_page()).await;
    let data_dir = tempfile::tempdir().expect("Failed to create data dir");

    // Seed yesterday's snapshot with a Gold price 2% below today's.
    let today = Utc::now().date_naive();
    let yesterday = today - chrono::Duration::days(1);
    {
        let store = DiskSnapshots::open(data_dir.path()).unwrap();
        let page = test_utils::fixture_page();
        let mut quotes = table::parse_quotes(&page, 2025);
        for quote in &mut quotes {
            if quote.name == "Gold" {
                quote.price = 1970.0;
            }
        }
        store.save_day(yesterday, &quotes).unwrap();
    }

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = format!(
        r#"
source:
  base_url: "{}"
reference_year: 2025
data_path: "{}"
subscriptions:
  - commodity: "Gold"
    email: "recipient@example.com"
    min_percent_change: 1.0
"#,
        mock_server.uri(),
        data_dir.path().display()
    );
    fs::write(config_file.path(), &config_content).expect("Failed to write config file");

    // Dry run: evaluation and display without SMTP configured.
    let result = cmx::run_command(
        cmx::AppCommand::Alerts { dry_run: true },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Alerts command failed: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_leads_flow_persists_ranks_and_compares_to_previous_day() {
    let mock_server = test_utils::create_page_mock_server(&test_utils::fixture_page()).await;
    let data_dir = tempfile::tempdir().expect("Failed to create data dir");

    // Seed yesterday's baseline with shuffled ranks so movers exist.
    let today = Utc::now().date_naive();
    let yesterday = today - chrono::Duration::days(1);
    {
        let store = DiskSnapshots::open(data_dir.path()).unwrap();
        let baseline: Vec<LeadRank> = [("Gold", "Metals", 1), ("Lithium", "Metals", 6)]
            .into_iter()
            .map(|(name, category, rank)| LeadRank {
                name: name.to_string(),
                category: category.to_string(),
                rank,
            })
            .collect();
        store.save_lead_ranks(yesterday, &baseline).unwrap();
    }

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = format!(
        r#"
source:
  base_url: "{}"
reference_year: 2025
data_path: "{}"
"#,
        mock_server.uri(),
        data_dir.path().display()
    );
    fs::write(config_file.path(), &config_content).expect("Failed to write config file");

    let result = cmx::run_command(
        cmx::AppCommand::Leads { changes: true },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Leads command failed: {:?}", result.err());

    // Today's ranks became the new baseline; Lithium leads on the weekly key.
    let store = DiskSnapshots::open(data_dir.path()).unwrap();
    let ranks = store.lead_ranks_on(today);
    assert_eq!(ranks.len(), 6);
    let lithium = ranks.iter().find(|r| r.name == "Lithium").unwrap();
    assert_eq!(lithium.rank, 1);
}

#[test_log::test(tokio::test)]
async fn test_page_without_rows_is_a_no_data_failure() {
    let mock_server =
        test_utils::create_page_mock_server("<html><body><p>maintenance</p></body></html>").await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = format!("source:\n  base_url: \"{}\"\n", mock_server.uri());
    fs::write(config_file.path(), &config_content).expect("Failed to write config file");

    let result = cmx::run_command(
        cmx::AppCommand::Leads { changes: false },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("No commodity rows found")
    );
}
