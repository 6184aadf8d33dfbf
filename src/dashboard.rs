mod config_reader;
mod io_excel;
mod page;
mod server;

use log::{info, warn};

use participation_stats::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use text_diff::print_diff;

use crate::args::Args;
use crate::dashboard::config_reader::*;
use crate::dashboard::io_excel::read_registrations;
use crate::dashboard::server::{serve, AppState};

#[derive(Debug, Snafu)]
pub enum DashboardError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Missing worksheet {sheet:?} in {path}"))]
    MissingSheet { sheet: String, path: String },
    #[snafu(display("Error reading worksheet {sheet:?}"))]
    ReadingSheet {
        source: calamine::XlsxError,
        sheet: String,
    },
    #[snafu(display("Worksheet {sheet:?} uses {width} columns, expected {expected}"))]
    UnexpectedColumnCount {
        sheet: String,
        width: usize,
        expected: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error handling JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid configuration: {source}"))]
    InvalidConfig { source: StatsErrors },
    #[snafu(display("Difference detected between calculated statistics and reference {path}"))]
    ReferenceMismatch { path: String },
    #[snafu(display("Cannot understand the address {addr:?}"))]
    InvalidAddress {
        source: std::net::AddrParseError,
        addr: String,
    },
    #[snafu(display("Cannot start the runtime"))]
    Runtime { source: std::io::Error },
    #[snafu(display("Cannot listen on {addr}"))]
    Binding {
        source: std::io::Error,
        addr: SocketAddr,
    },
    #[snafu(display("Server stopped unexpectedly"))]
    Serving { source: std::io::Error },
}

pub type DashboardResult<T> = Result<T, DashboardError>;

fn export_table(out: &str, pretty_js: &str) -> DashboardResult<()> {
    if out == "stdout" {
        println!("{}", pretty_js);
    } else {
        info!("Writing statistics to {:?}", out);
        fs::write(out, pretty_js).context(WritingOutputSnafu { path: out })?;
    }
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js: &str) -> DashboardResult<()> {
    let reference = read_reference(reference_path)?;
    let pretty_js_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    if pretty_js_ref != pretty_js {
        warn!("Found differences with the reference statistics");
        print_diff(pretty_js_ref.as_str(), pretty_js, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("Statistics match the reference {:?}", reference_path);
    Ok(())
}

/// Reads the workbook, computes the statistics and serves the map until the
/// process is stopped.
pub fn run(args: &Args) -> DashboardResult<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => DashboardConfig::default(),
    };
    info!("config: {:?}", config);

    let records = read_registrations(&args.input, &config)?;
    let table = run_participation_stats(&records, &config);

    if args.out.is_some() || args.reference.is_some() {
        let pretty_js =
            serde_json::to_string_pretty(&table_to_json(&table)).context(ParsingJsonSnafu {})?;
        if let Some(out) = &args.out {
            export_table(out, &pretty_js)?;
        }
        if let Some(reference_path) = &args.reference {
            check_reference(reference_path, &pretty_js)?;
        }
    }

    if args.no_serve {
        return Ok(());
    }

    let addr: SocketAddr = args.bind.parse().context(InvalidAddressSnafu {
        addr: args.bind.clone(),
    })?;
    let state = Arc::new(AppState::new(config, table));
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context(RuntimeSnafu {})?;
    runtime.block_on(serve(addr, state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_mismatch_is_an_error() {
        let dir = std::env::temp_dir().join(format!("partmap-ref-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("reference.json");
        fs::write(&path, r#"{"rows": []}"#).unwrap();
        let path = path.to_str().unwrap();

        let empty = serde_json::to_string_pretty(&table_to_json(&[])).unwrap();
        assert!(check_reference(path, &empty).is_ok());

        let table = vec![AggregateRow {
            competition: ALL_COMPETITIONS.to_string(),
            country: "Chile".to_string(),
            teams: 1,
            participants: 1,
            organizations: 1,
            participation: Some(1),
        }];
        let pretty_js = serde_json::to_string_pretty(&table_to_json(&table)).unwrap();
        assert!(matches!(
            check_reference(path, &pretty_js),
            Err(DashboardError::ReferenceMismatch { .. })
        ));
    }

    #[test]
    fn missing_workbook_is_fatal() {
        let args = Args {
            input: "/nonexistent/Registration.xlsx".to_string(),
            config: None,
            bind: "127.0.0.1:0".to_string(),
            out: None,
            reference: None,
            no_serve: true,
            verbose: false,
        };
        assert!(matches!(
            run(&args),
            Err(DashboardError::OpeningExcel { .. })
        ));
    }
}
