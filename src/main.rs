use clap::Parser;
use flowmap::cli::{Cli, Command};
use flowmap::{
    cmd_add, cmd_check, cmd_copy, cmd_delete, cmd_export, cmd_init, cmd_render, cmd_serve,
    cmd_types,
};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Command::Check(args) => cmd_check(args),
        Command::Render(args) => cmd_render(args),
        Command::Export(args) => cmd_export(args),
        Command::Add(args) => cmd_add(args),
        Command::Delete(args) => cmd_delete(args),
        Command::Types(args) => cmd_types(args),
        Command::Copy(args) => cmd_copy(args),
        Command::Serve(args) => cmd_serve(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}

/// `RUST_LOG` wins; otherwise `-v` raises the crate's level.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "warn,flowmap=debug",
        _ => "warn,flowmap=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
