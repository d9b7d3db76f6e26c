//! RPC Dispatch Gen command line
//!
//! Turns a TOML method table into the C dispatch files for the CBOR RPC runtime.

use clap::{Arg, ArgAction, Command};
use rpc_dispatch_gen::core::logging::init_logging;
use rpc_dispatch_gen::{core::Config, log_info, log_warn, Error, Generator, Result};

fn main() -> Result<()> {
    // Parse command line arguments
    let matches = cli().get_matches();

    // Load configuration
    let mut config = if let Some(config_path) = matches.get_one::<String>("config") {
        let mut config = Config::from_file(config_path)?;
        config.apply_env_overrides()?;
        config
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    apply_cli_overrides(&mut config, &matches)?;
    config.validate()?;

    init_logging(&config.logging)?;

    log_info!("Starting {} v{}", rpc_dispatch_gen::NAME, rpc_dispatch_gen::VERSION);
    if config.methods.is_empty() {
        log_warn!("No user methods declared, only system methods will be generated");
    }

    let report = Generator::new(config)?.run()?;

    log_info!(
        "Generated {} methods ({} restarts, {} files written)",
        report.table.len(),
        report.restarts,
        report.written.len()
    );
    Ok(())
}

/// Command line definition
fn cli() -> Command {
    Command::new("rpc-dispatch-gen")
        .version(rpc_dispatch_gen::VERSION)
        .about("Generate perfect-hash dispatch tables for CBOR RPC servers.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Method table / configuration file path")
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Directory the generated files are written to")
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("N")
                .help("Pin the salt seed for reproducible output")
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Build and verify the table without writing files")
        )
}

/// Apply command line argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, matches: &clap::ArgMatches) -> Result<()> {
    if let Some(dir) = matches.get_one::<String>("output-dir") {
        config.output.dir = dir.into();
    }

    if let Some(seed) = matches.get_one::<String>("seed") {
        config.hash.seed = Some(seed.parse()
            .map_err(|e| Error::config(format!("Invalid seed: {}", e)))?);
    }

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.logging.level = level.clone();
    }

    if matches.get_flag("dry-run") {
        config.output.dry_run = true;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let matches = cli()
            .try_get_matches_from([
                "rpc-dispatch-gen",
                "-o",
                "build/gen",
                "--seed",
                "99",
                "--log-level",
                "debug",
                "--dry-run",
            ])
            .unwrap();

        let mut config = Config::default();
        apply_cli_overrides(&mut config, &matches).unwrap();

        assert_eq!(config.output.dir, std::path::PathBuf::from("build/gen"));
        assert_eq!(config.hash.seed, Some(99));
        assert_eq!(config.logging.level, "debug");
        assert!(config.output.dry_run);
    }

    #[test]
    fn test_cli_rejects_bad_seed() {
        let matches = cli()
            .try_get_matches_from(["rpc-dispatch-gen", "--seed", "abc"])
            .unwrap();

        let mut config = Config::default();
        let err = apply_cli_overrides(&mut config, &matches).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_cli_leaves_config_alone_without_flags() {
        let matches = cli().try_get_matches_from(["rpc-dispatch-gen"]).unwrap();
        let mut config = Config::default();
        apply_cli_overrides(&mut config, &matches).unwrap();
        assert_eq!(config.hash.seed, None);
        assert!(!config.output.dry_run);
    }
}
