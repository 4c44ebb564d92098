use anyhow::Result;
use colored::Colorize;

use crate::core::Config;

/// Write the default configuration to `~/.gputoprc`
pub fn generate() -> Result<()> {
    let path = Config::dump_defaults()?;

    println!(
        "{} {}",
        "✓".green(),
        "Default configuration written to:".white()
    );
    println!("  {}", path.display().to_string().cyan().bold());

    Ok(())
}
