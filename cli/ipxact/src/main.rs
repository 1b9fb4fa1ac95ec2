//! ipxact CLI: validate libraries of IP-XACT components, abstraction
//! definitions and bus definitions.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};

use manifest::IpxactManifest;

#[derive(Parser)]
#[command(name = "ipxact", version, about = "IP-XACT document validator")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every component and abstraction definition of a library
    Validate {
        /// Library directory (repeatable, default: from ipxact.toml or ./library)
        #[arg(long = "library", short = 'l')]
        libraries: Vec<PathBuf>,
        /// Report format (human, json)
        #[arg(long)]
        report: Option<String>,
    },
    /// List the documents of a library
    List {
        /// Library directory (repeatable, default: from ipxact.toml or ./library)
        #[arg(long = "library", short = 'l')]
        libraries: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let (manifest, project_dir) = load_manifest_optional(&cwd)?;
    let project_dir = project_dir.unwrap_or(cwd);

    match cli.command {
        Commands::Validate { libraries, report } => commands::validate::run(
            &project_dir,
            manifest.as_ref(),
            &libraries,
            report.as_deref(),
        ),
        Commands::List { libraries } => {
            commands::list::run(&project_dir, manifest.as_ref(), &libraries)
        }
    }
}

fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<IpxactManifest>, Option<PathBuf>)> {
    match IpxactManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_libraries() {
        let cli = Cli::parse_from(["ipxact", "-vv", "validate", "-l", "ip", "--library", "buses"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Validate { libraries, report } => {
                assert_eq!(libraries, vec![PathBuf::from("ip"), PathBuf::from("buses")]);
                assert!(report.is_none());
            }
            Commands::List { .. } => panic!("expected validate"),
        }
    }

    #[test]
    fn manifest_drives_library_and_strictness() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ipxact.toml"),
            "[project]\nname = \"soc\"\n\n[library]\npaths = [\"missing\"]\n\n[validation]\nfail-on-warning = true\n",
        )
        .unwrap();

        let (manifest, project_dir) = load_manifest_optional(dir.path()).unwrap();
        let manifest = manifest.unwrap();
        let project_dir = project_dir.unwrap();
        assert!(commands::validate::run(&project_dir, Some(&manifest), &[], None).is_err());

        let mut lenient = manifest;
        lenient.validation.fail_on_warning = false;
        commands::validate::run(&project_dir, Some(&lenient), &[], None).unwrap();
    }
}
