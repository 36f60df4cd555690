//! TCPing - TCP connect and HTTP(S) GET latency probing

use clap::Parser;
use std::process;
use tcping::{app::App, cli::Cli, config::load_config, error::AppError};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    if cli.is_informational() {
        // help wins when both are given
        if cli.help {
            print!("{}", cli.display_help());
        } else {
            print!("{}", cli.display_version());
        }
        return;
    }

    let use_color = cli.color;
    let config = match load_config(cli) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e, use_color),
    };
    let use_color = config.options.color;

    if let Err(e) = App::new(config).run().await {
        exit_with_error(&e, use_color);
    }
}

fn exit_with_error(error: &AppError, use_color: bool) -> ! {
    eprintln!("{}", error.format_for_console(use_color));
    process::exit(error.exit_code());
}
