use anyhow::Result;
use roadscene_core::Config;
use roadscene_enhancer::RngSource;
use std::path::Path;

pub fn execute(config_path: &Path, description: &str, seed: Option<u64>) -> Result<()> {
    let config = Config::load_from(config_path)?;
    let enhancer = config.enhancer.build();

    let mut rng = RngSource::from_seed_opt(seed);
    let enhancement = enhancer.enhance_detailed(description, &mut rng)?;

    println!("Category: {}", enhancement.category);
    if let Some(location) = &enhancement.location {
        println!("Location: {}", location);
    }
    println!("{}", enhancement.enhanced);
    Ok(())
}
