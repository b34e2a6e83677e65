pub mod dates;
pub mod records;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

use pagedex_core::ingest::DEFAULT_INDEX;
use pagedex_core::ExtractorKind;

#[derive(Parser)]
#[command(
    name = "pgdx",
    about = "Turn extracted document pages into entity records for indexing",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build one record per page file under a directory tree
    Records(RecordsArgs),
    /// Print the ISO dates recognized in each argument
    Dates {
        /// Date mentions to normalize
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

#[derive(Args)]
pub struct RecordsArgs {
    /// Directory containing `<doc>.pdf_page<N>.pdf.txt` files
    pub input: PathBuf,
    /// Directory receiving the records (mirrors the input tree)
    pub output: PathBuf,
    /// Where entity spans come from
    #[arg(long, value_enum, default_value_t = ExtractorArg::Spans)]
    pub extractor: ExtractorArg,
    /// NER service URL (http extractor)
    #[arg(long, env = "PAGEDEX_NER_URL")]
    pub endpoint: Option<Url>,
    /// NER request timeout in seconds
    #[arg(long, env = "PAGEDEX_NER_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout: u64,
    /// Output layout
    #[arg(long, value_enum, default_value_t = FormatArg::Records)]
    pub format: FormatArg,
    /// Bulk file name inside the output directory (bulk format)
    #[arg(long, default_value = "records.ndjson")]
    pub bulk_file: PathBuf,
    /// Index name written into bulk actions
    #[arg(long, default_value = DEFAULT_INDEX)]
    pub index: String,
    /// Pages processed concurrently
    #[arg(short = 'j', long, default_value_t = 4)]
    pub jobs: usize,
    /// Fail pages that have no `.ents.json` sidecar (spans extractor)
    #[arg(long)]
    pub strict_spans: bool,
    /// Also pick up dates with the built-in rules
    #[arg(long)]
    pub date_rules: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtractorArg {
    Http,
    Spans,
    Rules,
}

impl From<ExtractorArg> for ExtractorKind {
    fn from(arg: ExtractorArg) -> Self {
        match arg {
            ExtractorArg::Http => Self::Http,
            ExtractorArg::Spans => Self::Spans,
            ExtractorArg::Rules => Self::Rules,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Records,
    Bulk,
}
