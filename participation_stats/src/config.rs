// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The pseudo-competition that groups the records of every real competition.
pub const ALL_COMPETITIONS: &str = "All Competitions";

/// The competitions, in the order in which their sheets are read.
pub const DEFAULT_COMPETITIONS: [&str; 4] = ["IROS 2024", "CDC 2024", "ICRA 2025", "CDC-TF 2025"];

pub const DEFAULT_HEADING: &str = "🏎️ RoboRacer Sim Racing League";
pub const DEFAULT_LINK: &str = "https://autodrive-ecosystem.github.io/competitions";

/// Spellings found in the registration sheets, mapped to the names understood by
/// the map renderer.
///
/// Matching is done on the exact string: "usa" is not an alias of "USA".
pub const DEFAULT_COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("USA", "United States"),
    ("U.S.", "United States"),
    ("United States of America (USA)", "United States"),
    ("United States (US)", "United States"),
    ("UAE", "United Arab Emirates"),
    ("United Arab Emirates (UAE)", "United Arab Emirates"),
    ("Côte d'Ivoire", "Ivory Coast"),
    ("Republic of Korea", "South Korea"),
    ("Republic of Türkiye", "Turkey"),
    ("Turkiye", "Turkey"),
    ("Türkiye", "Turkey"),
    ("UK", "United Kingdom"),
    ("U.K.", "United Kingdom"),
];

/// One line of a registration sheet, as read from the spreadsheet.
///
/// Blank cells are `None`. The team columns are usually only filled on the
/// first member of each team.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawRow {
    pub sr_no: Option<String>,
    pub team_name: Option<String>,
    pub team_member: Option<String>,
    pub organization: Option<String>,
    pub country: Option<String>,
}

/// A team member registered for a competition.
///
/// After normalization, `country` holds a single canonical country name.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub sr_no: Option<String>,
    pub team_name: Option<String>,
    pub team_member: String,
    pub organization: Option<String>,
    pub country: Option<String>,
    pub competition: String,
}

// ******** Output data structures *********

/// Statistics for one country, either within one competition or across all of
/// them (`competition == ALL_COMPETITIONS`).
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRow {
    pub competition: String,
    pub country: String,
    pub teams: u64,
    pub participants: u64,
    pub organizations: u64,
    /// Number of distinct competitions. Only defined for the all-competitions rows.
    pub participation: Option<u64>,
}

/// The statistics that can be displayed on the map.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Metric {
    Teams,
    Participants,
    Organizations,
    Participation,
}

impl Metric {
    /// All the metrics, in display order. The first one is the fallback.
    pub const ALL: [Metric; 4] = [
        Metric::Teams,
        Metric::Participants,
        Metric::Organizations,
        Metric::Participation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Teams => "Number of Teams",
            Metric::Participants => "Number of Participants",
            Metric::Organizations => "Number of Organizations",
            Metric::Participation => "Number of Competitions",
        }
    }

    /// The value of this metric for a row. Undefined values count as zero.
    pub fn value(&self, row: &AggregateRow) -> u64 {
        match self {
            Metric::Teams => row.teams,
            Metric::Participants => row.participants,
            Metric::Organizations => row.organizations,
            Metric::Participation => row.participation.unwrap_or(0),
        }
    }
}

/// Errors raised when the dashboard is not configured correctly.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StatsErrors {
    EmptyCompetitionList,
    EmptyCompetitionName,
    DuplicateCompetition(String),
    ReservedCompetitionName,
}

impl Error for StatsErrors {}

impl Display for StatsErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsErrors::EmptyCompetitionList => write!(f, "no competition configured"),
            StatsErrors::EmptyCompetitionName => write!(f, "competition names cannot be empty"),
            StatsErrors::DuplicateCompetition(name) => {
                write!(f, "competition {:?} is listed more than once", name)
            }
            StatsErrors::ReservedCompetitionName => {
                write!(f, "{:?} is reserved and cannot name a competition", ALL_COMPETITIONS)
            }
        }
    }
}

// ********* Configuration **********

/// Everything fixed at startup: the competitions to read, the alias table and
/// the page heading.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DashboardConfig {
    competitions: Vec<String>,
    pub heading: String,
    pub link: String,
    aliases: HashMap<String, String>,
}

impl DashboardConfig {
    pub fn new(competitions: &[String]) -> Result<DashboardConfig, StatsErrors> {
        if competitions.is_empty() {
            return Err(StatsErrors::EmptyCompetitionList);
        }
        for (idx, name) in competitions.iter().enumerate() {
            check_competition_name(name)?;
            if competitions[..idx].contains(name) {
                return Err(StatsErrors::DuplicateCompetition(name.clone()));
            }
        }
        Ok(DashboardConfig {
            competitions: competitions.to_vec(),
            ..DashboardConfig::default()
        })
    }

    pub fn with_heading(self, heading: &str, link: &str) -> DashboardConfig {
        DashboardConfig {
            heading: heading.to_string(),
            link: link.to_string(),
            ..self
        }
    }

    /// The real competitions, in reading order.
    pub fn competitions(&self) -> &[String] {
        &self.competitions
    }

    /// The choices offered by the competition selector.
    pub fn competition_options(&self) -> Vec<String> {
        let mut res = vec![ALL_COMPETITIONS.to_string()];
        res.extend(self.competitions.iter().cloned());
        res
    }

    /// The canonical name of a country token. Unknown spellings are returned unchanged.
    pub fn canonical_country<'a>(&'a self, token: &'a str) -> &'a str {
        self.aliases.get(token).map(|s| s.as_str()).unwrap_or(token)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            competitions: DEFAULT_COMPETITIONS.iter().map(|s| s.to_string()).collect(),
            heading: DEFAULT_HEADING.to_string(),
            link: DEFAULT_LINK.to_string(),
            aliases: DEFAULT_COUNTRY_ALIASES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

pub(crate) fn check_competition_name(name: &str) -> Result<(), StatsErrors> {
    if name.is_empty() {
        return Err(StatsErrors::EmptyCompetitionName);
    }
    if name == ALL_COMPETITIONS {
        return Err(StatsErrors::ReservedCompetitionName);
    }
    Ok(())
}
