//! The recomputation behind the map page.
//!
//! Every change of the competition or metric selector calls [`update_view`]
//! with the current selections. It only reads the aggregate table.

use std::collections::HashSet;

use log::debug;
use serde::Serialize;
use serde_json::json;
use serde_json::Value as JSValue;

pub use crate::config::*;

/// Above this value, the color bar ticks are spaced to show about six steps.
const MAX_UNIT_TICK: u64 = 20;

/// A choice of the metric selector.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct MetricOption {
    pub label: String,
    pub value: Metric,
}

/// The sums shown under the map title.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize)]
pub struct Totals {
    pub participants: u64,
    pub teams: u64,
    pub organizations: u64,
    pub countries: u64,
}

/// The result of one interaction: the new metric choices, the metric
/// effectively selected and the plotly figure to draw.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct ViewUpdate {
    pub metric_options: Vec<MetricOption>,
    pub metric: Metric,
    pub figure: JSValue,
}

/// The metrics that make sense for a competition selection.
///
/// The number of competitions is only defined across all competitions.
pub fn valid_metrics(competition: &str) -> Vec<Metric> {
    Metric::ALL
        .iter()
        .filter(|m| competition == ALL_COMPETITIONS || **m != Metric::Participation)
        .cloned()
        .collect()
}

/// The selected metric if it is valid, otherwise the first valid metric.
pub fn resolve_metric(competition: &str, metric: Metric) -> Metric {
    let valid = valid_metrics(competition);
    if valid.contains(&metric) {
        metric
    } else {
        valid[0]
    }
}

pub fn compute_totals(rows: &[&AggregateRow]) -> Totals {
    let countries: HashSet<&str> = rows.iter().map(|r| r.country.as_str()).collect();
    Totals {
        participants: rows.iter().map(|r| r.participants).sum(),
        teams: rows.iter().map(|r| r.teams).sum(),
        organizations: rows.iter().map(|r| r.organizations).sum(),
        countries: countries.len() as u64,
    }
}

/// The text shown when hovering a country, one statistic per line.
pub fn hover_text(row: &AggregateRow, with_participation: bool) -> String {
    let mut lines = vec![
        row.country.clone(),
        format!("Teams: {}", row.teams),
        format!("Participants: {}", row.participants),
        format!("Organizations: {}", row.organizations),
    ];
    if with_participation {
        lines.push(format!(
            "Competitions: {}",
            Metric::Participation.value(row)
        ));
    }
    lines.join("<br>")
}

/// The spacing between two ticks of the color bar.
///
/// ```
/// use participation_stats::view::tick_interval;
///
/// assert_eq!(tick_interval(15), 1);
/// assert_eq!(tick_interval(42), 7);
/// ```
pub fn tick_interval(max_value: u64) -> u64 {
    if max_value <= MAX_UNIT_TICK {
        return 1;
    }
    let tick = (max_value as f64 / 6.0).round_ties_even() as u64;
    tick.max(1)
}

/// Recomputes the map for the given selections.
///
/// An unknown competition selects no row and produces an empty map.
pub fn update_view(competition: &str, metric: Metric, table: &[AggregateRow]) -> ViewUpdate {
    let rows: Vec<&AggregateRow> = table
        .iter()
        .filter(|r| r.competition == competition)
        .collect();
    let is_all = competition == ALL_COMPETITIONS;

    let metric = resolve_metric(competition, metric);
    let metric_options: Vec<MetricOption> = valid_metrics(competition)
        .iter()
        .map(|m| MetricOption {
            label: m.label().to_string(),
            value: *m,
        })
        .collect();

    let totals = compute_totals(&rows);
    let max_value = rows.iter().map(|r| metric.value(r)).max().unwrap_or(0);
    let dtick = tick_interval(max_value);
    debug!(
        "update_view: competition: {:?} metric: {:?} rows: {:?} max: {:?} dtick: {:?}",
        competition,
        metric,
        rows.len(),
        max_value,
        dtick
    );

    let figure = build_figure(competition, metric, &rows, &totals, dtick, is_all);
    ViewUpdate {
        metric_options,
        metric,
        figure,
    }
}

fn build_figure(
    competition: &str,
    metric: Metric,
    rows: &[&AggregateRow],
    totals: &Totals,
    dtick: u64,
    with_participation: bool,
) -> JSValue {
    let locations: Vec<&str> = rows.iter().map(|r| r.country.as_str()).collect();
    let values: Vec<u64> = rows.iter().map(|r| metric.value(r)).collect();
    let hover: Vec<String> = rows
        .iter()
        .map(|r| format!("{}<extra></extra>", hover_text(r, with_participation)))
        .collect();

    let title = format!(
        "🌍 Global Participation Map — {} ({})<br>\
         <span style='font-size:12px; color:gray;'>\
         {} Participants | {} Teams | {} Organizations | {} Countries</span>",
        competition,
        metric.label(),
        totals.participants,
        totals.teams,
        totals.organizations,
        totals.countries
    );

    json!({
        "data": [{
            "type": "choropleth",
            "locations": locations,
            "locationmode": "country names",
            "z": values,
            "coloraxis": "coloraxis",
            "hovertemplate": hover,
        }],
        "layout": {
            "title": {"text": title, "x": 0.5, "xanchor": "center"},
            "geo": {
                "showland": true,
                "landcolor": "lightgray",
                "showocean": true,
                "oceancolor": "aliceblue",
            },
            "margin": {"l": 100, "r": 50, "t": 140, "b": 50},
            "coloraxis": {
                "colorscale": "Rainbow",
                "colorbar": {
                    "title": {"text": metric.label(), "side": "right", "font": {"size": 12}},
                    "tickangle": 90,
                    "tickmode": "linear",
                    "tick0": 0,
                    "dtick": dtick,
                    "y": 0.5,
                    "yanchor": "middle",
                    "lenmode": "fraction",
                },
            },
        },
    })
}
