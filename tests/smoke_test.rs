//! Live smoke test against the Datastream Web Service.
//!
//! Needs `DSWS_USERNAME` and `DSWS_PASSWORD` (or the credentials file) and
//! network access. Run with:
//! ```sh
//! cargo test --test smoke_test -- --ignored --nocapture
//! ```

use commodity_overview::render::CellState;
use commodity_overview::{catalog, CommodityDashboard, PageSelection, TimeRange};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn section(name: &str) {
    eprintln!("\n{}", "=".repeat(60));
    eprintln!("  {}", name);
    eprintln!("{}", "=".repeat(60));
}

struct Counters {
    pass: usize,
    fail: usize,
}

impl Counters {
    fn check(&mut self, label: &str, condition: bool, detail: &str) {
        let status = if condition { "PASS" } else { "FAIL" };
        if condition {
            self.pass += 1;
        } else {
            self.fail += 1;
        }
        if detail.is_empty() {
            eprintln!("  [{}] {}", status, label);
        } else {
            eprintln!("  [{}] {} -- {}", status, label, detail);
        }
    }
}

// ---------------------------------------------------------------------------
// Main smoke test
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn smoke_test() {
    let mut dashboard = CommodityDashboard::builder().build().unwrap();
    let mut c = Counters { pass: 0, fail: 0 };

    for category in catalog::categories() {
        section(category.name);

        let result = match dashboard.fetch_category(category.name, "1Y") {
            Ok(result) => result,
            Err(e) => {
                c.check("fetch", false, &e.to_string());
                continue;
            }
        };
        c.check(
            "series columns",
            result.series.width() > 0,
            &format!("width={}, dates={}", result.series.width(), result.series.len()),
        );
        c.check(
            "snapshot rows",
            !result.snapshot.is_empty(),
            &format!("rows={}", result.snapshot.len()),
        );

        let rendered = dashboard.render(&result);
        let plotted = rendered.grid.plotted().count();
        let no_data = rendered
            .grid
            .cells
            .iter()
            .filter(|cell| matches!(cell.state, CellState::NoData { .. }))
            .count();
        c.check(
            "grid",
            rendered.grid.cells.len() == 12,
            &format!("plotted={}, no_data={}", plotted, no_data),
        );
    }

    section("Page");
    let selection = PageSelection {
        category: "Metals".to_string(),
        time_range: TimeRange::TwoYears,
    };
    match dashboard.page(&selection) {
        Ok(html) => c.check("page", html.contains("<svg"), &format!("{} bytes", html.len())),
        Err(e) => c.check("page", false, &e.to_string()),
    }
    c.check("display", true, &dashboard.to_string());

    section("SMOKE TEST COMPLETE");
    eprintln!("  Passed:  {}", c.pass);
    eprintln!("  Failed:  {}", c.fail);
    assert_eq!(c.fail, 0, "{} smoke test checks failed", c.fail);
}
