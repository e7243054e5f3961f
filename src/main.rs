use clap::Parser;
use dayplan::cli::commands::{Cli, Commands};
use dayplan::cli::handlers;
use dayplan::io::config_io;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Init(args)) => {
            // Init runs before the config is read so it can replace a broken one
            let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref());
            handlers::cmd_init(&data_dir, args)
        }
        _ => handlers::dispatch(cli),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
