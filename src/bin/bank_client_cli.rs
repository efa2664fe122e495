use std::process;

use clap::Parser;

use bank_client::cli::{run_cli, CliMode, CliOptions};

#[derive(Parser, Debug)]
#[command(name = "bank_client_cli", about = "Terminal client for the banking API", version)]
struct Args {
    /// Base URL of the banking API for this session
    #[arg(long, env = "BANK_API_URL")]
    api_url: Option<String>,

    /// Read commands from stdin instead of the interactive editor
    #[arg(long, env = "BANK_CLIENT_SCRIPT")]
    script: bool,
}

fn main() {
    bank_client::init();
    let args = Args::parse();

    let options = CliOptions {
        mode: if args.script {
            CliMode::Script
        } else {
            CliMode::Interactive
        },
        api_url: args.api_url,
    };

    if let Err(err) = run_cli(options) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
