use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gbdatasets")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract labeled CSV datasets from GenBank archives")]
#[command(
    long_about = "gbdatasets scans an annotated GenBank flat-file archive and produces \
                       labeled CSV datasets for classifier training, one per extraction approach."
)]
#[command(before_help = "🧬 gbdatasets - GenBank Dataset Extraction Tool")]
#[command(after_help = "EXAMPLES:\n  \
    gbdatasets genome.gb --approach sites\n  \
    gbdatasets genome.gb --approach all --output datasets --verbose\n  \
    gbdatasets genome.gb --approach rebuild --max-length 10000\n  \
    gbdatasets genome.gb --config my-config.toml\n\n\
    Each approach writes {name}_genbank.csv into the output directory.")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// GenBank archive to scan
    #[arg(required_unless_present = "generate_config")]
    pub archive: Option<PathBuf>,

    /// Extraction approach to run
    #[arg(short, long, value_enum, default_value_t = Approach::Sites)]
    pub approach: Approach,

    /// Output directory for dataset files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Progress cache file path
    #[arg(long, help = "Record-count cache used to size the progress bar")]
    pub cache: Option<PathBuf>,

    /// Maximum sequence length to accept
    #[arg(long, help = "Applies to every approach; longer inputs are skipped")]
    pub max_length: Option<usize>,

    /// Short flank window length (site extraction)
    #[arg(long)]
    pub flank_small: Option<usize>,

    /// Extended flank window length (site extraction)
    #[arg(long)]
    pub flank_default: Option<usize>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Show the extraction plan without scanning the archive")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Approach {
    /// Per-feature exon/intron sites with flank windows
    Sites,
    /// Whole sequence rebuilt with inline feature markers
    Rebuild,
    /// Per-symbol exon/intron/unknown label string
    SlidingWindow,
    /// CDS translation qualifiers
    Protein,
    /// Run all four approaches in sequence
    All,
}

impl Approach {
    /// The concrete approaches this selection expands to, in run order.
    pub fn expand(self) -> Vec<Approach> {
        match self {
            Approach::All => vec![
                Approach::Sites,
                Approach::Rebuild,
                Approach::SlidingWindow,
                Approach::Protein,
            ],
            other => vec![other],
        }
    }

    /// Dataset file stem, kept compatible with the historical naming.
    pub fn file_stem(self) -> &'static str {
        match self {
            Approach::Sites => "ExInSeqs",
            Approach::Rebuild => "RebuildSeqs",
            Approach::SlidingWindow => "SWExInSeqs",
            Approach::Protein => "ProteinSeqs",
            Approach::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_output_dir(self.output.clone())
            .with_cache_path(self.cache.clone())
            .with_max_length(self.max_length)
            .with_flank_small(self.flank_small)
            .with_flank_default(self.flank_default)
    }

    pub fn should_use_colors(&self) -> bool {
        !self.quiet && console::Term::stdout().features().colors_supported()
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_for_test(approach: Approach) -> Cli {
        Cli {
            archive: Some(PathBuf::from("genome.gb")),
            approach,
            output: None,
            cache: None,
            max_length: None,
            flank_small: None,
            flank_default: None,
            config: None,
            output_format: OutputFormat::Human,
            verbose: 0,
            quiet: false,
            dry_run: false,
            generate_config: false,
        }
    }

    #[test]
    fn test_approach_expansion() {
        assert_eq!(Approach::Sites.expand(), vec![Approach::Sites]);
        assert_eq!(
            Approach::All.expand(),
            vec![
                Approach::Sites,
                Approach::Rebuild,
                Approach::SlidingWindow,
                Approach::Protein
            ]
        );
    }

    #[test]
    fn test_file_stems() {
        assert_eq!(Approach::Sites.file_stem(), "ExInSeqs");
        assert_eq!(Approach::Rebuild.file_stem(), "RebuildSeqs");
        assert_eq!(Approach::SlidingWindow.file_stem(), "SWExInSeqs");
        assert_eq!(Approach::Protein.file_stem(), "ProteinSeqs");
    }

    #[test]
    fn test_cli_overrides_from_flags() {
        let mut cli = cli_for_test(Approach::Rebuild);
        cli.output = Some(PathBuf::from("out"));
        cli.max_length = Some(4096);

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.output_dir, Some(PathBuf::from("out")));
        assert_eq!(overrides.max_length, Some(4096));
        assert!(overrides.flank_small.is_none());
    }

    #[test]
    fn test_load_config_applies_overrides() {
        let mut cli = cli_for_test(Approach::Sites);
        cli.max_length = Some(1234);

        let config = cli.load_config().unwrap();
        assert_eq!(config.extraction.sites.sequence_max_length, 1234);
        assert_eq!(config.extraction.protein.sequence_max_length, 1234);
    }

    #[test]
    fn test_verbosity_level() {
        let mut cli = cli_for_test(Approach::Sites);
        cli.verbose = 2;
        assert_eq!(cli.verbosity_level(), 2);

        cli.quiet = true;
        assert_eq!(cli.verbosity_level(), 0);
    }
}
