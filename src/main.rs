//! factory-energy entry point: CLI wiring, configuration and reporting.

mod cli;

use std::io::{self, BufRead, Write};
use std::process;

use tracing::{error, info};

use factory_energy::catalog::DirectoryCatalog;
use factory_energy::config::AppConfig;
use factory_energy::energy::{Estimate, Estimator};
use factory_energy::io::export::export_csv;
use factory_energy::logging;

/// Exit code for fatal errors: bad arguments or config, missing product.
const EXIT_FAILURE: i32 = 1;
/// Exit code when no floor can produce the product.
const EXIT_NO_MATCH: i32 = 2;

fn prompt_product() -> io::Result<String> {
    print!("Enter the product name: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn main() {
    let cli = match cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(EXIT_FAILURE);
        }
    };

    // --config takes priority, then config.toml / config.json, then defaults
    let loaded = match cli.config {
        Some(ref path) => AppConfig::from_path(path),
        None => AppConfig::discover(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            process::exit(EXIT_FAILURE);
        }
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(EXIT_FAILURE);
    }

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("error: {e}");
        process::exit(EXIT_FAILURE);
    }

    let raw_product = match cli.product {
        Some(product) => product,
        None => match prompt_product() {
            Ok(line) => line,
            Err(e) => {
                eprintln!("error: cannot read product name: {e}");
                process::exit(EXIT_FAILURE);
            }
        },
    };
    let product = raw_product.trim().to_lowercase();
    if product.is_empty() {
        eprintln!("error: no product name given");
        process::exit(EXIT_FAILURE);
    }

    info!(
        product = %product,
        root = %config.root_directory.display(),
        templates = ?config.templates,
        "estimating energy"
    );

    let catalog = DirectoryCatalog::new(&config.root_directory);
    let estimate = match Estimator::new(&catalog, &config.templates).estimate(&product) {
        Ok(estimate) => estimate,
        Err(e) => {
            error!(error = %e, "estimation aborted");
            eprintln!("error: {e}");
            process::exit(EXIT_FAILURE);
        }
    };

    println!("{estimate}");

    let report = match estimate {
        Estimate::Matched(report) => report,
        Estimate::NoCapableFloor { .. } => process::exit(EXIT_NO_MATCH),
    };

    if let Some(ref path) = cli.breakdown_out {
        if let Err(e) = export_csv(&report.energy, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(EXIT_FAILURE);
        }
        eprintln!("Breakdown written to {}", path.display());
    }
}
