use anyhow::{Context, Result};
use khana_infrastructure::ConfigService;

pub fn init(service: &ConfigService) -> Result<()> {
    let created = service
        .init_default()
        .with_context(|| format!("Failed to write {}", service.path().display()))?;
    if created {
        println!("✓ Wrote default configuration to {}", service.path().display());
    } else {
        println!("Configuration already exists at {}", service.path().display());
    }
    Ok(())
}

pub fn show(service: &ConfigService) -> Result<()> {
    let config = service
        .load()
        .with_context(|| format!("Failed to load {}", service.path().display()))?;
    println!("# {}", service.path().display());
    print!("{}", config.to_toml_string()?);
    Ok(())
}
