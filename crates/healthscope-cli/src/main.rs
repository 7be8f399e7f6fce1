use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use serde::Serialize;
use std::path::PathBuf;

use healthscope_cli::commands::importance::run_importance;
use healthscope_cli::commands::load_config;
use healthscope_cli::commands::predict::run_predict;
use healthscope_cli::commands::summary::run_summary;
use healthscope_risk::config::Domain;

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .help("Path to the service JSON configuration file")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn domain_arg() -> Arg {
    Arg::new("domain")
        .help("Model domain")
        .required(true)
        .value_parser(["heart", "diabetes", "pcos"])
        .value_hint(ValueHint::Other)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("HEALTHSCOPE_LOG", "error,healthscope=info"))
        .init();

    let matches = Command::new("healthscope")
        .version(clap::crate_version!())
        .about("HealthScope CLI - risk prediction for heart disease, diabetes and PCOS")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("predict")
                .about("Predict risk for one patient record")
                .arg(domain_arg())
                .arg(
                    Arg::new("input")
                        .help("Path to a JSON object of feature values")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("importance")
                .about("List the most important features of a domain's model")
                .arg(domain_arg())
                .arg(
                    Arg::new("top_n")
                        .short('n')
                        .long("top-n")
                        .help("Number of features to report. Defaults to the configured value.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("summary")
                .about("Summarize one or more CSV datasets")
                .arg(
                    Arg::new("datasets")
                        .help("CSV files with a header row")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("importance", sub_m)) => handle_importance(sub_m),
        Some(("summary", sub_m)) => handle_summary(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn domain(matches: &ArgMatches) -> Result<Domain> {
    let name = matches
        .get_one::<String>("domain")
        .map(String::as_str)
        .unwrap_or_default();
    name.parse().map_err(anyhow::Error::msg)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let domain = domain(matches)?;
    let config = load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let Some(input) = matches.get_one::<PathBuf>("input") else {
        unreachable!("input is required by CLI configuration")
    };
    log::info!("[HealthScope] Predicting {} risk for {:?}", domain, input);

    let result = run_predict(&config, domain, input)?;
    print_json(&result)
}

fn handle_importance(matches: &ArgMatches) -> Result<()> {
    let domain = domain(matches)?;
    let config = load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let top_n = matches.get_one::<usize>("top_n").copied();

    let ranked = run_importance(&config, domain, top_n)?;
    print_json(&ranked)
}

fn handle_summary(matches: &ArgMatches) -> Result<()> {
    let paths: Vec<PathBuf> = matches
        .get_many::<PathBuf>("datasets")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let reports = run_summary(&paths).inspect_err(|e| log::error!("Summary failed: {:#}", e))?;
    print_json(&reports)
}
