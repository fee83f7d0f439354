use std::env;
use std::path::PathBuf;

pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub product: Option<String>,
    pub breakdown_out: Option<PathBuf>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut config = None;
    let mut product = None;
    let mut breakdown_out = None;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --config (expected a TOML or JSON file path)",
                )?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--product" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --product (expected a product name)")?;
                if product.replace(name.to_string()).is_some() {
                    return Err("--product provided more than once".to_string());
                }
            }
            "--breakdown-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --breakdown-out (expected a file path)",
                )?;
                if breakdown_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--breakdown-out provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(CliOptions {
        config,
        product,
        breakdown_out,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  factory-energy [--config <path>] [--product <name>] [--breakdown-out <path>]"
    );
    eprintln!();
    eprintln!("Without --config, config.toml or config.json in the working directory is used.");
    eprintln!("Without --product, the product name is read from standard input.");
}
