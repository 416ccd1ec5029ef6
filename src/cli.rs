use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blindcmp")]
#[command(
    version,
    about = "blindcmp - Screenshot comparison with blind regions",
    long_about = "blindcmp\n\nModes:\n- hash: canonical content hash of a screenshot after masking blind regions.\n- mask: write a copy of a screenshot with blind regions painted black.\n- diff: locate changed areas between two screenshots and optionally write an annotated diff image.\n- match: decide whether a candidate matches a baseline (exit 0 match, 1 mismatch).\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output (debug logging on stderr)")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) to set overlay style and browser; CLI flags override config"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, short, global = true, help = "Output file path (stdout if omitted)")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the canonical hash of a screenshot with blind regions masked
    Hash {
        #[arg(long, help = "Screenshot file")]
        image: PathBuf,

        #[arg(long, help = REGIONS_HELP)]
        regions: Option<PathBuf>,
    },

    /// Paint blind regions over a screenshot and write the result as PNG
    Mask {
        #[arg(long, help = "Screenshot file")]
        image: PathBuf,

        #[arg(long, help = REGIONS_HELP)]
        regions: Option<PathBuf>,

        #[arg(long, help = "Where to write the masked PNG")]
        out: PathBuf,
    },

    /// Locate changed areas between two screenshots
    Diff {
        #[arg(long, help = "Baseline screenshot file")]
        baseline: PathBuf,

        #[arg(long, help = "Candidate screenshot file (the diff is drawn on it)")]
        candidate: PathBuf,

        #[arg(long, help = REGIONS_HELP)]
        regions: Option<PathBuf>,

        #[arg(long, help = "Write the annotated diff PNG here")]
        diff_out: Option<PathBuf>,

        #[arg(long, help = "Write the raw XOR image instead of the annotated diff")]
        xor: bool,
    },

    /// Decide whether a candidate matches the baseline
    Match {
        #[arg(long, help = "Baseline screenshot file")]
        baseline: PathBuf,

        #[arg(long, help = "Candidate screenshot file")]
        candidate: PathBuf,

        #[arg(long, help = REGIONS_HELP)]
        regions: Option<PathBuf>,

        #[arg(
            long,
            value_name = "HEX",
            help = "Stored baseline hash (computed from --baseline when omitted)"
        )]
        hash: Option<String>,

        #[arg(long, help = "Browser the regions belong to (overrides config)")]
        browser: Option<String>,

        #[arg(long, help = "Write the annotated diff PNG here on mismatch")]
        diff_out: Option<PathBuf>,

        #[arg(long, help = "Render the diff even when the screenshots match")]
        always_diff: bool,
    },
}

const REGIONS_HELP: &str = "Path to JSON {\"local\":[...],\"category\":[...],\"global\":[...]} of {left,top,width,height} blind regions";

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
