use anyhow::{bail, Result};

use albumwall_core::AppConfig;

pub fn show(config: &AppConfig) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    println!("{}", config.to_toml()?);
    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() && !force {
        bail!(
            "Config file already exists at {}\nUse --force to overwrite it.",
            path.display()
        );
    }
    AppConfig::default().save()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
