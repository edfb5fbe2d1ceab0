use clap::Parser;
use docker_audit::{
    handlers::{handle_dockerignore, handle_list_rules, run_audit},
    Cli,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.list_rules {
        return handle_list_rules();
    }

    if cli.dockerignore {
        return handle_dockerignore(&cli);
    }

    run_audit(&cli)
}
