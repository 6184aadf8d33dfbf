mod config;
use log::{debug, info};
use regex::Regex;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::OnceLock;

pub use crate::config::*;

pub mod builder;
pub mod manual;
pub mod view;

// **** Private structures ****

// The distinct values seen in one group of records.
#[derive(Debug, Default)]
struct GroupStats<'a> {
    teams: HashSet<&'a str>,
    participants: u64,
    organizations: HashSet<&'a str>,
    competitions: HashSet<&'a str>,
}

impl<'a> GroupStats<'a> {
    fn add(&mut self, record: &'a RegistrationRecord) {
        if let Some(team) = record.team_name.as_deref() {
            self.teams.insert(team);
        }
        if let Some(org) = record.organization.as_deref() {
            self.organizations.insert(org);
        }
        self.competitions.insert(record.competition.as_str());
        self.participants += 1;
    }

    fn to_row(&self, competition: &str, country: &str, with_participation: bool) -> AggregateRow {
        AggregateRow {
            competition: competition.to_string(),
            country: country.to_string(),
            teams: self.teams.len() as u64,
            participants: self.participants,
            organizations: self.organizations.len() as u64,
            participation: if with_participation {
                Some(self.competitions.len() as u64)
            } else {
                None
            },
        }
    }
}

/// Splits a country cell that may name several countries.
///
/// The separators are `,`, `&`, `/` and the word `and` when surrounded by
/// whitespace. Every token is trimmed. Empty tokens are kept.
///
/// ```
/// use participation_stats::split_countries;
///
/// assert_eq!(split_countries("India & USA"), vec!["India", "USA"]);
/// assert_eq!(split_countries("Andorra"), vec!["Andorra"]);
/// ```
pub fn split_countries(raw: &str) -> Vec<String> {
    country_separators()
        .replace_all(raw, ",")
        .split(',')
        .map(|s| s.trim().to_string())
        .collect()
}

// Commas are left in place; the other separators are rewritten to commas.
fn country_separators() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| {
        Regex::new(r"\s*&\s*|\s*/\s*|\s+and\s+").expect("country separator pattern")
    })
}

/// Produces one record per country named in each record, with canonical
/// country names.
///
/// Records without a country are kept as they are.
pub fn normalize_records(
    records: &[RegistrationRecord],
    config: &DashboardConfig,
) -> Vec<RegistrationRecord> {
    let mut res: Vec<RegistrationRecord> = Vec::new();
    for record in records.iter() {
        let raw = match record.country.as_deref() {
            Some(raw) => raw,
            None => {
                res.push(record.clone());
                continue;
            }
        };
        let tokens = split_countries(raw);
        if tokens.len() > 1 {
            debug!("normalize_records: split {:?} into {:?}", raw, tokens);
        }
        for token in tokens.iter() {
            res.push(RegistrationRecord {
                country: Some(config.canonical_country(token).to_string()),
                ..record.clone()
            });
        }
    }
    res
}

/// Computes the statistics per competition and country, followed by the
/// statistics per country across all the competitions.
///
/// Records without a country are not counted.
pub fn aggregate(records: &[RegistrationRecord]) -> Vec<AggregateRow> {
    let mut per_competition: BTreeMap<(&str, &str), GroupStats> = BTreeMap::new();
    let mut per_country: BTreeMap<&str, GroupStats> = BTreeMap::new();
    for record in records.iter() {
        let country = match record.country.as_deref() {
            Some(c) => c,
            None => continue,
        };
        per_competition
            .entry((record.competition.as_str(), country))
            .or_default()
            .add(record);
        per_country.entry(country).or_default().add(record);
    }

    let mut res: Vec<AggregateRow> = Vec::new();
    for ((competition, country), stats) in per_competition.iter() {
        res.push(stats.to_row(competition, country, false));
    }
    for (country, stats) in per_country.iter() {
        res.push(stats.to_row(ALL_COMPETITIONS, country, true));
    }
    res
}

/// Runs the full pipeline on the records read from the sheets: country
/// normalization then aggregation.
///
/// Arguments:
/// * `records` the forward-filled records of all the competitions
/// * `config` the dashboard configuration, which holds the country aliases
pub fn run_participation_stats(
    records: &[RegistrationRecord],
    config: &DashboardConfig,
) -> Vec<AggregateRow> {
    info!(
        "Processing {:?} registrations for competitions {:?}",
        records.len(),
        config.competitions()
    );
    let normalized = normalize_records(records, config);
    info!(
        "run_participation_stats: {:?} records after country normalization",
        normalized.len()
    );

    let countries: BTreeSet<&str> = normalized
        .iter()
        .filter_map(|r| r.country.as_deref())
        .collect();
    // Countries outside of the renderer's list are silently left blank on the map.
    info!("Countries: {:?}", countries);

    let table = aggregate(&normalized);
    info!("run_participation_stats: {:?} aggregated rows", table.len());
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SheetBuilder;

    fn record(team: &str, member: &str, org: &str, country: &str, comp: &str) -> RegistrationRecord {
        RegistrationRecord {
            sr_no: None,
            team_name: Some(team.to_string()),
            team_member: member.to_string(),
            organization: Some(org.to_string()),
            country: Some(country.to_string()),
            competition: comp.to_string(),
        }
    }

    fn find<'a>(table: &'a [AggregateRow], comp: &str, country: &str) -> &'a AggregateRow {
        table
            .iter()
            .find(|r| r.competition == comp && r.country == country)
            .unwrap()
    }

    #[test]
    fn split_on_all_separators() {
        assert_eq!(split_countries("USA/Canada"), vec!["USA", "Canada"]);
        assert_eq!(split_countries("USA / Canada"), vec!["USA", "Canada"]);
        assert_eq!(
            split_countries("India and UK, Spain"),
            vec!["India", "UK", "Spain"]
        );
        assert_eq!(split_countries(" Chile "), vec!["Chile"]);
        assert_eq!(split_countries("USA,"), vec!["USA", ""]);
    }

    #[test]
    fn and_needs_surrounding_whitespace() {
        assert_eq!(split_countries("Andorra"), vec!["Andorra"]);
        assert_eq!(split_countries("Rwanda"), vec!["Rwanda"]);
        assert_eq!(split_countries("Poland andorra"), vec!["Poland andorra"]);
        // The whitespace after a separator is consumed with it.
        assert_eq!(split_countries("Peru & and Chile"), vec!["Peru", "and Chile"]);
    }

    #[test]
    fn separators_accept_any_whitespace() {
        assert_eq!(split_countries("Peru\tand\tChile"), vec!["Peru", "Chile"]);
        assert_eq!(split_countries("Peru\t&\nChile"), vec!["Peru", "Chile"]);
        assert_eq!(split_countries("Peru an d Chile"), vec!["Peru an d Chile"]);
        assert_eq!(split_countries("Peru andand Chile"), vec!["Peru andand Chile"]);
        assert_eq!(split_countries("&/"), vec!["", "", ""]);
        assert_eq!(split_countries(""), vec![""]);
    }

    #[test]
    fn single_country_is_unchanged() {
        let config = DashboardConfig::default();
        let input = vec![record("T", "Ann", "O", "Germany", "CDC 2024")];
        assert_eq!(normalize_records(&input, &config), input);
    }

    #[test]
    fn compound_country_explodes() {
        let config = DashboardConfig::default();
        let input = vec![record("T", "Ann", "O", "U.K. & Republic of Türkiye", "CDC 2024")];
        let res = normalize_records(&input, &config);
        let countries: Vec<&str> = res.iter().filter_map(|r| r.country.as_deref()).collect();
        assert_eq!(countries, vec!["United Kingdom", "Turkey"]);
        assert!(res.iter().all(|r| r.team_member == "Ann"));
    }

    #[test]
    fn us_spellings_share_a_bucket() {
        let config = DashboardConfig::default();
        let input = vec![
            record("T1", "Ann", "O1", "U.S.", "CDC 2024"),
            record("T2", "Ben", "O2", "USA", "CDC 2024"),
            record("T3", "Cid", "O3", "United States of America (USA)", "CDC 2024"),
        ];
        let table = run_participation_stats(&input, &config);
        let row = find(&table, "CDC 2024", "United States");
        assert_eq!(row.teams, 3);
        assert_eq!(row.participants, 3);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn duplicate_team_names_count_once() {
        let input = vec![
            record("T1", "Ann", "O1", "Chile", "A"),
            record("T1", "Ben", "O1", "Chile", "A"),
            record("T2", "Cid", "O1", "Chile", "A"),
        ];
        let table = aggregate(&input);
        let row = find(&table, "A", "Chile");
        assert_eq!((row.teams, row.participants, row.organizations), (2, 3, 1));
        assert_eq!(row.participation, None);
    }

    #[test]
    fn all_competitions_is_its_own_pass() {
        // The same team in two competitions is a single team overall.
        let input = vec![
            record("T1", "Ann", "O1", "Chile", "A"),
            record("T1", "Ann", "O1", "Chile", "B"),
            record("T2", "Ben", "O2", "Peru", "B"),
        ];
        let table = aggregate(&input);
        let chile = find(&table, ALL_COMPETITIONS, "Chile");
        assert_eq!(chile.teams, 1);
        assert_eq!(chile.participants, 2);
        assert_eq!(chile.participation, Some(2));
        assert_eq!(find(&table, ALL_COMPETITIONS, "Peru").participation, Some(1));
    }

    #[test]
    fn rows_are_ordered_per_competition_then_overall() {
        let input = vec![
            record("T1", "Ann", "O1", "Peru", "B"),
            record("T2", "Ben", "O2", "Chile", "A"),
            record("T3", "Cid", "O3", "Peru", "A"),
        ];
        let keys: Vec<(String, String)> = aggregate(&input)
            .into_iter()
            .map(|r| (r.competition, r.country))
            .collect();
        let expected: Vec<(String, String)> = [
            ("A", "Chile"),
            ("A", "Peru"),
            ("B", "Peru"),
            (ALL_COMPETITIONS, "Chile"),
            (ALL_COMPETITIONS, "Peru"),
        ]
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn records_without_country_are_skipped() {
        let mut input = vec![record("T1", "Ann", "O1", "Chile", "A")];
        input.push(RegistrationRecord {
            country: None,
            ..record("T2", "Ben", "O2", "", "A")
        });
        let table = aggregate(&input);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn alias_matching_is_case_sensitive() {
        let _ = env_logger::try_init();
        let config = DashboardConfig::new(&["A".to_string(), "B".to_string()]).unwrap();
        let mut records: Vec<RegistrationRecord> = Vec::new();

        let mut sheet_a = SheetBuilder::new("A").unwrap();
        sheet_a.add_row_simple(&["1", "Team1", "Ann", "MIT", "USA"]);
        sheet_a.add_row_simple(&["", "", "Ben", "", ""]);
        sheet_a.add_row_simple(&["2", "Team2", "Cid", "TUM", "Germany"]);
        records.extend(sheet_a.finish());

        let mut sheet_b = SheetBuilder::new("B").unwrap();
        sheet_b.add_row_simple(&["1", "Team3", "Dee", "CMU", "usa"]);
        records.extend(sheet_b.finish());

        let table = run_participation_stats(&records, &config);
        let us = find(&table, "A", "United States");
        assert_eq!((us.teams, us.participants), (1, 2));
        assert_eq!(find(&table, "A", "Germany").participants, 1);
        assert_eq!(find(&table, "B", "usa").participants, 1);
        assert_eq!(
            find(&table, ALL_COMPETITIONS, "United States").participation,
            Some(1)
        );
        assert_eq!(find(&table, ALL_COMPETITIONS, "usa").participation, Some(1));
    }
}
