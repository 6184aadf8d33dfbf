use crate::dashboard::*;

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(rename = "competitions")]
    pub competitions: Option<Vec<String>>,
    #[serde(rename = "heading")]
    pub heading: Option<String>,
    #[serde(rename = "link")]
    pub link: Option<String>,
}

impl FileConfig {
    /// The dashboard configuration, with the defaults for the missing fields.
    pub fn dashboard_config(&self) -> DashboardResult<DashboardConfig> {
        let base = match &self.competitions {
            Some(competitions) => {
                DashboardConfig::new(competitions).context(InvalidConfigSnafu {})?
            }
            None => DashboardConfig::default(),
        };
        let heading = self.heading.clone().unwrap_or_else(|| base.heading.clone());
        let link = self.link.clone().unwrap_or_else(|| base.link.clone());
        Ok(base.with_heading(&heading, &link))
    }
}

pub fn parse_config(contents: &str) -> DashboardResult<DashboardConfig> {
    let file_config: FileConfig = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    file_config.dashboard_config()
}

pub fn read_config(path: &str) -> DashboardResult<DashboardConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_config(&contents)
}

pub fn read_reference(path: &str) -> DashboardResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

pub fn table_to_json(table: &[AggregateRow]) -> JSValue {
    json!({ "rows": table })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn overrides_competitions_and_heading() {
        let config =
            parse_config(r#"{"competitions": ["A", "B"], "heading": "League"}"#).unwrap();
        assert_eq!(config.competitions(), &["A".to_string(), "B".to_string()]);
        assert_eq!(config.heading, "League");
        assert_eq!(config.link, DashboardConfig::default().link);
        // The aliases are not configurable.
        assert_eq!(config.canonical_country("UK"), "United Kingdom");
    }

    #[test]
    fn invalid_competitions_are_refused() {
        assert!(matches!(
            parse_config(r#"{"competitions": ["A", "A"]}"#),
            Err(DashboardError::InvalidConfig {
                source: StatsErrors::DuplicateCompetition(_)
            })
        ));
        assert!(matches!(
            parse_config(r#"{"aliases": {}}"#),
            Err(DashboardError::ParsingJson { .. })
        ));
    }

    #[test]
    fn table_json_lists_rows() {
        let table = vec![AggregateRow {
            competition: "A".to_string(),
            country: "Chile".to_string(),
            teams: 1,
            participants: 2,
            organizations: 1,
            participation: None,
        }];
        let js = table_to_json(&table);
        assert_eq!(js["rows"][0]["country"], json!("Chile"));
        assert_eq!(js["rows"][0]["participation"], JSValue::Null);
    }
}
