use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "recon-ninja", version, about = "Automated bug bounty recon pipeline")]
pub struct Cli {
    /// Target domain
    #[arg(short = 'd', long = "domain")]
    pub domain: String,

    /// Path to Nuclei templates
    #[arg(short = 't', long = "templates")]
    pub templates: PathBuf,

    /// Output directory (default: ./output)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Verbose logs
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Debug logs (implies verbose)
    #[arg(long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,
}

impl Cli {
    /// `--debug` wins over `-v`; without either only warnings are logged.
    pub fn log_level(&self) -> tracing::Level {
        match (self.debug, self.verbose) {
            (true, _) => tracing::Level::DEBUG,
            (false, true) => tracing::Level::INFO,
            (false, false) => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_required_and_optional_options() {
        let cli = Cli::try_parse_from([
            "recon-ninja",
            "-d",
            "example.com",
            "-t",
            "/templates",
            "-o",
            "runs",
        ])
        .unwrap();

        assert_eq!(cli.domain, "example.com");
        assert_eq!(cli.templates, PathBuf::from("/templates"));
        assert_eq!(cli.output, Some(PathBuf::from("runs")));
        assert!(cli.config.is_none());
    }

    #[test]
    fn output_is_optional() {
        let cli = Cli::try_parse_from(["recon-ninja", "--domain", "example.com", "--templates", "t"])
            .unwrap();
        assert!(cli.output.is_none());
    }

    #[test]
    fn missing_templates_is_a_usage_error() {
        assert!(Cli::try_parse_from(["recon-ninja", "-d", "example.com"]).is_err());
        assert!(Cli::try_parse_from(["recon-ninja", "-t", "/templates"]).is_err());
    }

    #[test]
    fn debug_outranks_verbose() {
        let parse = |extra: &[&str]| {
            let mut argv = vec!["recon-ninja", "-d", "example.com", "-t", "t"];
            argv.extend_from_slice(extra);
            Cli::try_parse_from(argv).unwrap().log_level()
        };

        assert_eq!(parse(&[]), tracing::Level::WARN);
        assert_eq!(parse(&["-v"]), tracing::Level::INFO);
        assert_eq!(parse(&["-v", "--debug"]), tracing::Level::DEBUG);
    }
}
