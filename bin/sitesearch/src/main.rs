//! Sitesearch CLI
//!
//! Builds a Stork search index for an already generated static site.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for sitesearch.
#[derive(Parser)]
#[command(
    name = "sitesearch",
    version,
    about = "Generate a Stork search index for a static site"
)]
struct Cli {
    /// Path to the settings file
    #[arg(short, long, default_value = "settings.toml")]
    config: std::path::PathBuf,

    /// Path to the site manifest exported by the site generator
    #[arg(short, long, default_value = "site.json")]
    site: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Write search.toml and build the search index
    Build {
        /// Output directory of the generated site
        #[arg(short, long, default_value = "output")]
        output: std::path::PathBuf,
        /// Name or path of the stork executable
        #[arg(long)]
        stork: Option<String>,
    },
    /// Print the search.toml that would be written, without building
    Check {
        /// Output directory of the generated site
        #[arg(short, long, default_value = "output")]
        output: std::path::PathBuf,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    sitesearch::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { output, stork } => {
            sitesearch::cmd::build::run(&cli.config, &cli.site, &output, stork.as_deref())?;
        }
        Commands::Check { output } => {
            let rendered = sitesearch::cmd::check::run(&cli.config, &cli.site, &output)?;
            print!("{rendered}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["sitesearch", "build", "--output", "public"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("settings.toml"));
        assert_eq!(cli.site, std::path::PathBuf::from("site.json"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build { output, stork } => {
                assert_eq!(output, std::path::PathBuf::from("public"));
                assert!(stork.is_none());
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_with_stork_override() {
        let args = ["sitesearch", "build", "--stork", "/opt/stork/bin/stork"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build { output, stork } => {
                assert_eq!(output, std::path::PathBuf::from("output"));
                assert_eq!(stork.as_deref(), Some("/opt/stork/bin/stork"));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["sitesearch", "check", "-o", "dist"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Check { output } => {
                assert_eq!(output, std::path::PathBuf::from("dist"));
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["sitesearch", "-vv", "build"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_custom_inputs() {
        let args = [
            "sitesearch",
            "--config",
            "pelican.toml",
            "--site",
            "export/site.json",
            "check",
        ];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, std::path::PathBuf::from("pelican.toml"));
        assert_eq!(cli.site, std::path::PathBuf::from("export/site.json"));
    }
}
