pub use crate::config::*;
use crate::config::check_competition_name;

/// A builder that turns the rows of one registration sheet into records.
///
/// The sequence number, team name, organization and country columns are
/// forward-filled: a blank cell takes the last value seen in the same column
/// of the sheet. Rows without a team member are dropped afterwards.
///
/// ```
/// pub use participation_stats::builder::SheetBuilder;
/// pub use participation_stats::RawRow;
/// # use participation_stats::StatsErrors;
///
/// let mut builder = SheetBuilder::new("ICRA 2025")?;
///
/// builder.add_row_simple(&["1", "Racers", "Anna", "MIT", "USA"]);
/// builder.add_row_simple(&["", "", "Bob", "", ""]);
///
/// let records = builder.finish();
/// assert_eq!(records[1].team_name.as_deref(), Some("Racers"));
///
/// # Ok::<(), StatsErrors>(())
/// ```
pub struct SheetBuilder {
    pub(crate) _competition: String,
    pub(crate) _last: RawRow,
    pub(crate) _records: Vec<RegistrationRecord>,
}

impl SheetBuilder {
    pub fn new(competition: &str) -> Result<SheetBuilder, StatsErrors> {
        check_competition_name(competition)?;
        Ok(SheetBuilder {
            _competition: competition.to_string(),
            _last: RawRow::default(),
            _records: Vec::new(),
        })
    }

    /// Adds a row given as its five cells. Empty strings are blank cells.
    ///
    /// Missing trailing cells are treated as blank.
    pub fn add_row_simple(&mut self, cells: &[&str]) {
        let cell = |idx: usize| -> Option<String> {
            cells
                .get(idx)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };
        self.add_row(&RawRow {
            sr_no: cell(0),
            team_name: cell(1),
            team_member: cell(2),
            organization: cell(3),
            country: cell(4),
        })
    }

    pub fn add_row(&mut self, row: &RawRow) {
        // The fill state advances even on rows that get dropped.
        fill(&mut self._last.sr_no, &row.sr_no);
        fill(&mut self._last.team_name, &row.team_name);
        fill(&mut self._last.organization, &row.organization);
        fill(&mut self._last.country, &row.country);

        let member = match &row.team_member {
            Some(m) => m.clone(),
            None => return,
        };
        self._records.push(RegistrationRecord {
            sr_no: self._last.sr_no.clone(),
            team_name: self._last.team_name.clone(),
            team_member: member,
            organization: self._last.organization.clone(),
            country: self._last.country.clone(),
            competition: self._competition.clone(),
        });
    }

    pub fn finish(self) -> Vec<RegistrationRecord> {
        self._records
    }
}

fn fill(last: &mut Option<String>, cell: &Option<String>) {
    if cell.is_some() {
        *last = cell.clone();
    }
}
