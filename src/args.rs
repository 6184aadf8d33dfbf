use clap::Parser;

/// Serves an interactive world map of the registrations to a series of competitions.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The Excel workbook with one worksheet per competition.
    #[clap(short, long, value_parser, default_value = "Registration.xlsx")]
    pub input: String,

    /// (file path, optional) A JSON file that overrides the list of competitions and the page heading.
    /// See the manual of the participation_stats crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (address) The address on which the map is served.
    #[clap(short, long, value_parser, default_value = "127.0.0.1:8050")]
    pub bind: String,

    /// (file path, 'stdout' or empty) If specified, the aggregated statistics will be written in JSON format to the
    /// given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the aggregated statistics in JSON format. If provided, the
    /// program checks that the computed statistics match the reference, and fails otherwise.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// If passed as an argument, stops after reading the data (and writing or checking the statistics)
    /// instead of serving the map.
    #[clap(long, takes_value = false)]
    pub no_serve: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
