use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io;

/// Create the data directory with a commented config.toml.
///
/// Runs before the config is loaded, so it also works to replace a broken one
/// (with `--force`).
pub fn cmd_init(data_dir: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_io::write_template(data_dir, args.force)?;
    println!("initialized {}", path.display());
    Ok(())
}
