//! Report renderer
//!
//! [`render`] is a pure function from a canonical report to a
//! [`RenderedReport`]: the summary plus four breakdown sections, each
//! resolved to an explicit per-section state (rendered, suppressed or
//! placeholder) so the display policy is enumerable instead of being
//! buried in branches. Terminal output happens separately in
//! [`printer`].

pub mod printer;

use std::collections::BTreeMap;

use crate::errors::{Result, ShortstatsError};
use crate::report::StatsReport;
use crate::utils::time::{format_date_label, format_day_label};

pub const HEADING_ENHANCED: &str = "📊 Enhanced Statistics";
pub const HEADING_BASIC: &str = "📊 Basic Statistics";
pub const TITLE_TIME_SERIES: &str = "📈 Clicks by Day (Last 30 Days)";
pub const TITLE_REFERRERS: &str = "🔗 Top Referrers";
pub const TITLE_USER_AGENTS: &str = "🌐 User Agents";
pub const TITLE_GEOGRAPHY: &str = "🌍 Geographic Distribution";

/// Placeholder shown when no per-country data exists for a code
pub const GEO_PLACEHOLDER: &str = "No geographic data available yet. \
     Country tracking starts for new clicks after this feature was added.";

/// Note shown when every country label is a local/non-geolocated origin
pub const GEO_LOCAL_NOTE: &str = "💡 Showing \"Local\" because you're testing from \
     localhost. In production with real visitors, you'll see actual countries!";

/// Substring marking a non-geolocated origin label
const LOCAL_MARKER: &str = "Local";

const USER_AGENT_LIMIT: usize = 10;
const COUNTRY_LIMIT: usize = 15;

/// Resolved display policy for one breakdown section
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Rendered(T),
    Suppressed,
    Placeholder,
}

impl<T> Section<T> {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Section::Rendered(_))
    }
}

/// Head block, present on every render
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub original_url: String,
    pub total_clicks: u64,
    pub unique_visitors: u64,
    pub created_label: String,
}

/// Label with a count and a bar scaled against the section maximum
#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
    pub label: String,
    pub count: u64,
    /// 0..=100, relative to the section's maximum count
    pub percentage: f64,
}

/// Plain label/count row without a bar
#[derive(Debug, Clone, PartialEq)]
pub struct CountRow {
    pub label: String,
    pub count: u64,
}

/// Geography row: bar scale plus this country's share of all clicks
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRow {
    pub label: String,
    pub count: u64,
    pub percentage: f64,
    /// Share of the total across all countries, truncated ones included
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoSection {
    pub local_note: bool,
    pub rows: Vec<GeoRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub heading: &'static str,
    pub code: String,
    pub summary: Summary,
    pub time_series: Section<Vec<BarRow>>,
    pub referrers: Section<Vec<CountRow>>,
    pub user_agents: Section<Vec<BarRow>>,
    pub geography: Section<GeoSection>,
}

/// Build the displayable report.
///
/// Pure: no network, no session state. A report without a code is
/// rejected outright so nothing partial is ever shown for malformed
/// data handed in from outside the normalizer.
pub fn render(report: &StatsReport) -> Result<RenderedReport> {
    if report.code.trim().is_empty() {
        return Err(ShortstatsError::invalid_payload("Invalid stats data received"));
    }

    let heading = if report.has_breakdowns() {
        HEADING_ENHANCED
    } else {
        HEADING_BASIC
    };

    Ok(RenderedReport {
        heading,
        code: report.code.clone(),
        summary: Summary {
            original_url: report.original_url.clone(),
            total_clicks: report.total_clicks,
            unique_visitors: report.unique_visitors,
            created_label: format_date_label(&report.created_at),
        },
        time_series: time_series_section(report.clicks_by_day.as_ref()),
        referrers: referrers_section(report),
        user_agents: user_agents_section(report.user_agents.as_ref()),
        geography: geography_section(report.countries.as_ref()),
    })
}

fn time_series_section(days: Option<&BTreeMap<String, u64>>) -> Section<Vec<BarRow>> {
    let Some(days) = days.filter(|d| !d.is_empty()) else {
        return Section::Suppressed;
    };
    let max = days.values().copied().max().unwrap_or(0);
    // ISO keys sort chronologically, so map order is already ascending
    let rows = days
        .iter()
        .map(|(day, &count)| BarRow {
            label: format_day_label(day),
            count,
            percentage: bar_percentage(count, max),
        })
        .collect();
    Section::Rendered(rows)
}

fn referrers_section(report: &StatsReport) -> Section<Vec<CountRow>> {
    let Some(referrers) = report.top_referrers.as_ref().filter(|r| !r.is_empty()) else {
        return Section::Suppressed;
    };
    let rows = referrers
        .iter()
        .map(|stat| CountRow {
            label: stat.label().to_string(),
            count: stat.count,
        })
        .collect();
    Section::Rendered(rows)
}

fn user_agents_section(agents: Option<&BTreeMap<String, u64>>) -> Section<Vec<BarRow>> {
    let Some(agents) = agents.filter(|a| !a.is_empty()) else {
        return Section::Suppressed;
    };
    // Bar scale comes from the full set, not just the displayed top 10
    let max = agents.values().copied().max().unwrap_or(0);
    let rows = descending(agents)
        .into_iter()
        .take(USER_AGENT_LIMIT)
        .map(|(label, count)| BarRow {
            label,
            count,
            percentage: bar_percentage(count, max),
        })
        .collect();
    Section::Rendered(rows)
}

fn geography_section(countries: Option<&BTreeMap<String, u64>>) -> Section<GeoSection> {
    let Some(countries) = countries.filter(|c| !c.is_empty()) else {
        return Section::Placeholder;
    };
    let max = countries.values().copied().max().unwrap_or(0);
    let total: u64 = countries.values().sum();
    let local_note = countries.keys().all(|label| label.contains(LOCAL_MARKER));
    let rows = descending(countries)
        .into_iter()
        .take(COUNTRY_LIMIT)
        .map(|(label, count)| GeoRow {
            label,
            count,
            percentage: bar_percentage(count, max),
            share_pct: if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect();
    Section::Rendered(GeoSection { local_note, rows })
}

/// Count descending, label ascending on ties
fn descending(entries: &BTreeMap<String, u64>) -> Vec<(String, u64)> {
    let mut rows: Vec<(String, u64)> = entries
        .iter()
        .map(|(label, &count)| (label.clone(), count))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows
}

fn bar_percentage(count: u64, max: u64) -> f64 {
    if max > 0 {
        (count as f64 / max as f64) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::report::ReferrerStat;

    fn basic_report() -> StatsReport {
        StatsReport {
            code: "abc123".to_string(),
            original_url: "https://example.com/landing".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 2, 10, 8, 30, 0).unwrap(),
            total_clicks: 42,
            unique_visitors: 17,
            clicks_by_day: None,
            top_referrers: None,
            user_agents: None,
            countries: None,
        }
    }

    fn map(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
        entries
            .iter()
            .map(|(label, count)| (label.to_string(), *count))
            .collect()
    }

    #[test]
    fn report_without_code_renders_nothing() {
        let mut report = basic_report();
        report.code = "  ".to_string();
        let err = render(&report).unwrap_err();
        assert!(matches!(err, ShortstatsError::InvalidPayload(_)));
        assert_eq!(err.message(), "Invalid stats data received");
    }

    #[test]
    fn basic_report_gets_summary_and_empty_states() {
        let rendered = render(&basic_report()).unwrap();
        assert_eq!(rendered.heading, HEADING_BASIC);
        assert_eq!(rendered.summary.original_url, "https://example.com/landing");
        assert_eq!(rendered.summary.total_clicks, 42);
        assert_eq!(rendered.summary.unique_visitors, 17);
        assert_eq!(rendered.summary.created_label, "Feb 10, 2024");
        assert_eq!(rendered.time_series, Section::Suppressed);
        assert_eq!(rendered.referrers, Section::Suppressed);
        assert_eq!(rendered.user_agents, Section::Suppressed);
        assert_eq!(rendered.geography, Section::Placeholder);
    }

    #[test]
    fn breakdowns_switch_the_heading() {
        let mut report = basic_report();
        report.clicks_by_day = Some(map(&[("2024-03-01", 1)]));
        let rendered = render(&report).unwrap();
        assert_eq!(rendered.heading, HEADING_ENHANCED);
    }

    #[test]
    fn time_series_is_ascending_with_bars_scaled_to_max() {
        let mut report = basic_report();
        report.clicks_by_day = Some(map(&[
            ("2024-03-02", 2),
            ("2024-03-01", 8),
            ("2024-03-03", 4),
        ]));
        let rendered = render(&report).unwrap();
        let Section::Rendered(rows) = rendered.time_series else {
            panic!("time series should render");
        };
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Mar 1, 2024", "Mar 2, 2024", "Mar 3, 2024"]);
        assert_eq!(rows[0].percentage, 100.0);
        assert_eq!(rows[1].percentage, 25.0);
        assert_eq!(rows[2].percentage, 50.0);
    }

    #[test]
    fn all_zero_counts_render_zero_width_bars() {
        let mut report = basic_report();
        report.clicks_by_day = Some(map(&[("2024-03-01", 0), ("2024-03-02", 0)]));
        let rendered = render(&report).unwrap();
        let Section::Rendered(rows) = rendered.time_series else {
            panic!("time series should render");
        };
        assert!(rows.iter().all(|r| r.percentage == 0.0));
    }

    #[test]
    fn empty_time_series_is_suppressed() {
        let mut report = basic_report();
        report.clicks_by_day = Some(BTreeMap::new());
        let rendered = render(&report).unwrap();
        assert_eq!(rendered.time_series, Section::Suppressed);
    }

    #[test]
    fn referrer_order_is_preserved_and_empty_label_is_direct() {
        let mut report = basic_report();
        report.top_referrers = Some(vec![
            ReferrerStat {
                referrer: "news.ycombinator.com".to_string(),
                count: 5,
            },
            ReferrerStat {
                referrer: String::new(),
                count: 20,
            },
        ]);
        let rendered = render(&report).unwrap();
        let Section::Rendered(rows) = rendered.referrers else {
            panic!("referrers should render");
        };
        assert_eq!(rows[0].label, "news.ycombinator.com");
        assert_eq!(rows[1].label, "Direct");
        assert_eq!(rows[1].count, 20);
    }

    #[test]
    fn user_agents_truncate_to_ten_sorted_descending() {
        let mut report = basic_report();
        let mut agents = BTreeMap::new();
        for i in 0..12u64 {
            agents.insert(format!("Agent{:02}", i), i + 1);
        }
        report.user_agents = Some(agents);
        let rendered = render(&report).unwrap();
        let Section::Rendered(rows) = rendered.user_agents else {
            panic!("user agents should render");
        };
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].label, "Agent11");
        assert_eq!(rows[0].count, 12);
        assert_eq!(rows[0].percentage, 100.0);
        assert_eq!(rows[9].count, 3);
        assert!(rows.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn user_agent_ties_break_alphabetically() {
        let mut report = basic_report();
        report.user_agents = Some(map(&[("Safari", 5), ("Chrome", 5), ("Edge", 9)]));
        let rendered = render(&report).unwrap();
        let Section::Rendered(rows) = rendered.user_agents else {
            panic!("user agents should render");
        };
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Edge", "Chrome", "Safari"]);
    }

    #[test]
    fn country_share_uses_total_across_truncated_entries() {
        let mut report = basic_report();
        let mut countries = BTreeMap::new();
        countries.insert("Atlantis".to_string(), 30);
        for i in 0..16u64 {
            countries.insert(format!("Country{:02}", i), 2);
        }
        report.countries = Some(countries);
        let rendered = render(&report).unwrap();
        let Section::Rendered(geo) = rendered.geography else {
            panic!("geography should render");
        };
        // 17 entries, display capped at 15; shares still divide by 62
        assert_eq!(geo.rows.len(), 15);
        assert_eq!(geo.rows[0].label, "Atlantis");
        assert!((geo.rows[0].share_pct - 30.0 / 62.0 * 100.0).abs() < 1e-9);
        assert_eq!(geo.rows[0].percentage, 100.0);
        assert!(!geo.local_note);
    }

    #[test]
    fn local_note_requires_every_label_to_be_local() {
        let mut report = basic_report();
        report.countries = Some(map(&[
            ("Local (Testing)", 6),
            ("Local (Private Network)", 2),
        ]));
        let rendered = render(&report).unwrap();
        let Section::Rendered(geo) = rendered.geography else {
            panic!("geography should render");
        };
        assert!(geo.local_note);

        report.countries = Some(map(&[("Local (Testing)", 6), ("Germany", 2)]));
        let rendered = render(&report).unwrap();
        let Section::Rendered(geo) = rendered.geography else {
            panic!("geography should render");
        };
        assert!(!geo.local_note);
    }

    #[test]
    fn empty_countries_show_the_placeholder() {
        let mut report = basic_report();
        report.countries = Some(BTreeMap::new());
        let rendered = render(&report).unwrap();
        assert_eq!(rendered.geography, Section::Placeholder);
    }
}
