use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vetter", version, about = "Open-source software supply-chain risk scanner", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Raise log verbosity; repeat for more (-vv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to vetter.toml (defaults to searching upward from the cwd)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover manifests, enrich packages and evaluate policy
    Scan(ScanArgs),
    /// Re-evaluate policy against a previously written JSON dump
    Query(QueryArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Walk this directory for supported manifests
    #[arg(short = 'D', long = "dir", value_name = "DIR", conflicts_with = "lockfiles")]
    pub dir: Option<PathBuf>,

    /// Scan these specific manifest files instead of walking a directory
    #[arg(long = "lockfiles", value_name = "PATH", num_args = 1..)]
    pub lockfiles: Vec<PathBuf>,

    /// A single policy expression to evaluate against every package
    #[arg(long, value_name = "EXPR", conflicts_with = "filter_suite")]
    pub filter: Option<String>,

    /// A Filter Suite YAML file to evaluate against every package
    #[arg(long = "filter-suite", value_name = "PATH")]
    pub filter_suite: Option<PathBuf>,

    /// Exit with status 2 if `--filter`/`--filter-suite` matches any package
    #[arg(long = "filter-fail")]
    pub filter_fail: bool,

    /// Suppress matches against packages listed in this exceptions file
    #[arg(long, value_name = "PATH")]
    pub exceptions: Option<PathBuf>,

    /// Write a replayable JSON dump of every enriched package to this directory
    #[arg(long = "json-dump", value_name = "DIR")]
    pub json_dump: Option<PathBuf>,

    /// Print the aggregate risk-category summary table on finish
    #[arg(long = "report-summary")]
    pub report_summary: bool,

    /// Write a Markdown report to this path on finish
    #[arg(long = "report-markdown", value_name = "PATH")]
    pub report_markdown: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Directory containing a JSON dump previously written by `scan --json-dump`
    #[arg(short = 'F', long = "from-dump", value_name = "DIR")]
    pub from_dump: PathBuf,

    /// A single policy expression to evaluate against every package
    #[arg(long, value_name = "EXPR", conflicts_with = "filter_suite")]
    pub filter: Option<String>,

    /// A Filter Suite YAML file to evaluate against every package
    #[arg(long = "filter-suite", value_name = "PATH")]
    pub filter_suite: Option<PathBuf>,

    /// Exit with status 2 if `--filter`/`--filter-suite` matches any package
    #[arg(long = "filter-fail")]
    pub filter_fail: bool,

    /// Suppress matches against packages listed in this exceptions file
    #[arg(long, value_name = "PATH")]
    pub exceptions: Option<PathBuf>,

    /// Print the aggregate risk-category summary table on finish
    #[arg(long = "report-summary")]
    pub report_summary: bool,

    /// Write a Markdown report to this path on finish
    #[arg(long = "report-markdown", value_name = "PATH")]
    pub report_markdown: Option<PathBuf>,

    /// Write a generated exceptions YAML document to this path instead of evaluating policy
    #[arg(long = "exceptions-generate", value_name = "PATH")]
    pub exceptions_generate: Option<PathBuf>,

    /// The expression selecting which packages to list in `--exceptions-generate`
    #[arg(long = "exceptions-filter", value_name = "EXPR", requires = "exceptions_generate")]
    pub exceptions_filter: Option<String>,

    /// Expiry date (YYYY-MM-DD) for generated exceptions; defaults to today + 90 days
    #[arg(long = "exceptions-till", value_name = "YYYY-MM-DD")]
    pub exceptions_till: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_requires_either_dir_or_lockfiles_to_be_meaningful_but_parses_bare() {
        let cli = Cli::parse_from(["vetter", "scan", "-D", "."]);
        match cli.command {
            Commands::Scan(args) => assert_eq!(args.dir, Some(PathBuf::from("."))),
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn dir_and_lockfiles_are_mutually_exclusive() {
        let result = Cli::try_parse_from(["vetter", "scan", "-D", ".", "--lockfiles", "requirements.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_count_accumulates() {
        let cli = Cli::parse_from(["vetter", "-vv", "scan", "-D", "."]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn query_exceptions_filter_requires_exceptions_generate() {
        let result = Cli::try_parse_from([
            "vetter",
            "query",
            "--from-dump",
            "out",
            "--exceptions-filter",
            "true",
        ]);
        assert!(result.is_err());
    }
}
