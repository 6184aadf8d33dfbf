// Reading the registration workbook.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use log::{debug, info};

use participation_stats::builder::SheetBuilder;

use crate::dashboard::*;

/// Sequence number, team name, team member, organization, country.
pub const COLUMN_COUNT: usize = 5;

/// Reads the worksheet of every competition, in the configured order.
pub fn read_registrations(
    path: &str,
    config: &DashboardConfig,
) -> DashboardResult<Vec<RegistrationRecord>> {
    info!("Attempting to read registration file {:?}", path);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let mut res: Vec<RegistrationRecord> = Vec::new();
    for competition in config.competitions() {
        let wrange = workbook
            .worksheet_range(competition)
            .context(MissingSheetSnafu {
                sheet: competition.as_str(),
                path,
            })?
            .context(ReadingSheetSnafu {
                sheet: competition.as_str(),
            })?;
        let mut records = read_sheet(&wrange, competition)?;
        info!(
            "read_registrations: {:?}: {:?} registrations",
            competition,
            records.len()
        );
        res.append(&mut records);
    }
    Ok(res)
}

/// Reads the rows of one worksheet, with the team columns forward-filled.
///
/// Cells are read by position, starting from column A.
pub fn read_sheet(
    wrange: &Range<DataType>,
    competition: &str,
) -> DashboardResult<Vec<RegistrationRecord>> {
    let (start, end) = match (wrange.start(), wrange.end()) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return UnexpectedColumnCountSnafu {
                sheet: competition,
                width: 0usize,
                expected: COLUMN_COUNT,
            }
            .fail()
        }
    };
    let width = end.1 as usize + 1;
    if width != COLUMN_COUNT {
        return UnexpectedColumnCountSnafu {
            sheet: competition,
            width,
            expected: COLUMN_COUNT,
        }
        .fail();
    }

    let mut builder = SheetBuilder::new(competition).context(InvalidConfigSnafu {})?;
    for row_idx in start.0..=end.0 {
        let cell = |col: u32| wrange.get_value((row_idx, col)).and_then(cell_text);
        let row = RawRow {
            sr_no: cell(0),
            team_name: cell(1),
            team_member: cell(2),
            organization: cell(3),
            country: cell(4),
        };
        debug!("read_sheet: {:?}: row {:?}: {:?}", competition, row_idx, row);
        builder.add_row(&row);
    }
    Ok(builder.finish())
}

// Integral floats up to this magnitude are printed without a fractional part.
const MAX_INTEGRAL_FLOAT: f64 = 1e15;

/// The text of a cell, or `None` for a blank cell.
///
/// Dates are printed as `YYYY-MM-DD`, with the time of day only when it is
/// not midnight.
fn cell_text(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) if s.is_empty() => None,
        DataType::String(s) => Some(s.clone()),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < MAX_INTEGRAL_FLOAT => {
            Some(format!("{}", *f as i64))
        }
        DataType::Float(f) => Some(f.to_string()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Bool(b) => Some(b.to_string()),
        DataType::DateTime(f) => match cell.as_datetime() {
            Some(dt) if dt.date().and_hms_opt(0, 0, 0) == Some(dt) => Some(dt.date().to_string()),
            Some(dt) => Some(dt.to_string()),
            None => Some(f.to_string()),
        },
        _ => None,
    }
}
