use std::io;
use std::process;

use clap::{Command, CommandFactory, Parser};
use clap_complete::{generate, Generator};
use tracing_subscriber::EnvFilter;

use keywork::cli::args::Cli;
use keywork::cli::commands::execute_command;
use keywork::cli::output;
use keywork::config::Settings;
use keywork::infrastructure::di::ServiceContainer;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "keywork=debug" } else { "keywork=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(generator) = cli.generator {
        let mut cmd = Cli::command();
        print_completions(generator, &mut cmd);
        return;
    }

    init_tracing(cli.verbose);

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            output::error(&format!("config: {}", e));
            process::exit(1);
        }
    };

    let container = match ServiceContainer::new(settings) {
        Ok(container) => container,
        Err(e) => {
            output::error(&e);
            process::exit(1);
        }
    };

    if let Err(e) = execute_command(&cli, &container).await {
        output::error(&e);
        process::exit(1);
    }
}
