use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
}

#[derive(Parser, Debug)]
#[command(
    name = "docker-audit",
    version,
    about = "Static security assessment for Dockerfiles",
    long_about = "docker-audit parses a Dockerfile, evaluates it against the CIS Docker Benchmark \
rule catalog, and reports a weighted security score with a remediation plan."
)]
pub struct Cli {
    /// Path to the Dockerfile to assess
    #[arg(default_value = "Dockerfile")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    /// Write the rendered report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the rule catalog and exit
    #[arg(long)]
    pub list_rules: bool,

    /// Request an optimized rewrite from the configured service
    #[arg(long)]
    pub optimize: bool,

    /// Apply the optimized Dockerfile in place (writes a backup first)
    #[arg(long, requires = "optimize")]
    pub apply: bool,

    /// Generate a default .dockerignore next to the Dockerfile
    #[arg(long)]
    pub dockerignore: bool,

    /// Exit with code 1 when the score falls below this threshold
    #[arg(long, default_value_t = 70)]
    pub fail_under: u32,

    /// Verbose output (show remediation for every finding)
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["docker-audit"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("Dockerfile"));
        assert!(matches!(cli.format, OutputFormat::Terminal));
        assert_eq!(cli.fail_under, 70);
        assert!(!cli.optimize);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_explicit_path_and_format() {
        let cli =
            Cli::try_parse_from(["docker-audit", "docker/Dockerfile.prod", "--format", "json"])
                .unwrap();
        assert_eq!(cli.path, PathBuf::from("docker/Dockerfile.prod"));
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn test_parse_markdown_with_output() {
        let cli = Cli::try_parse_from([
            "docker-audit",
            "--format",
            "markdown",
            "--output",
            "report.md",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Markdown));
        assert_eq!(cli.output, Some(PathBuf::from("report.md")));
    }

    #[test]
    fn test_apply_requires_optimize() {
        assert!(Cli::try_parse_from(["docker-audit", "--apply"]).is_err());
        assert!(Cli::try_parse_from(["docker-audit", "--optimize", "--apply"]).is_ok());
    }

    #[test]
    fn test_fail_under_threshold() {
        let cli = Cli::try_parse_from(["docker-audit", "--fail-under", "90"]).unwrap();
        assert_eq!(cli.fail_under, 90);
    }

    #[test]
    fn test_list_rules_flag() {
        let cli = Cli::try_parse_from(["docker-audit", "--list-rules"]).unwrap();
        assert!(cli.list_rules);
    }
}
