use anyhow::Result;
use roadscene_core::Config;
use roadscene_enhancer::SceneCategory;
use std::path::Path;

pub fn execute(config_path: &Path, key: Option<&str>, value: Option<&str>) -> Result<()> {
    let mut config = Config::load_from(config_path)?;

    match (key, value) {
        // Show all config
        (None, None) => {
            println!("Configuration file: {:?}\n", config_path);
            println!("[daemon]");
            println!("  host = \"{}\"", config.daemon.host);
            println!("  port = {}", config.daemon.port);
            println!(
                "  monitor_interval_secs = {}",
                config.daemon.monitor_interval_secs
            );
            println!();
            println!("[backend]");
            println!("  url = \"{}\"", config.backend.url);
            println!(
                "  api_key = {}",
                config.backend.api_key.as_ref().map(|_| "***").unwrap_or("(not set)")
            );
            println!("  timeout_secs = {}", config.backend.timeout_secs);
            println!();
            println!("[generation]");
            println!("  width = {}", config.generation.width);
            println!("  height = {}", config.generation.height);
            println!("  steps = {}", config.generation.steps);
            println!("  guidance_scale = {}", config.generation.guidance_scale);
            println!(
                "  negative_prompt = \"{}\"",
                config.generation.negative_prompt
            );
            println!();
            println!("[output]");
            println!("  directory = {:?}", config.output.directory);
            println!();
            println!("[enhancer]");
            println!("  places = {}", config.enhancer.places.join(", "));
            for category in config.enhancer.features.categories() {
                println!(
                    "  features.{} = {}",
                    category,
                    get_config_value(&config, &format!("enhancer.features.{}", category))?
                );
            }
        }

        // Get a specific key
        (Some(key), None) => {
            let value = get_config_value(&config, key)?;
            println!("{}", value);
        }

        // Set a specific key
        (Some(key), Some(value)) => {
            set_config_value(&mut config, key, value)?;
            config.save_to(config_path)?;
            println!("Set {} = {}", key, value);
        }

        _ => unreachable!(),
    }

    Ok(())
}

/// Feature phrases are written as one value separated by ';'
const PHRASE_SEPARATOR: char = ';';

fn get_config_value(config: &Config, key: &str) -> Result<String> {
    if let Some(category) = key.strip_prefix("enhancer.features.") {
        let category: SceneCategory = category.parse().map_err(anyhow::Error::msg)?;
        return Ok(config
            .enhancer
            .features
            .phrases(category)
            .map(|p| p.join("; "))
            .unwrap_or_default());
    }

    match key {
        "daemon.host" => Ok(config.daemon.host.clone()),
        "daemon.port" => Ok(config.daemon.port.to_string()),
        "daemon.monitor_interval_secs" => Ok(config.daemon.monitor_interval_secs.to_string()),
        "backend.url" => Ok(config.backend.url.clone()),
        "backend.api_key" => Ok(config
            .backend
            .api_key
            .as_ref()
            .map(|_| "***".to_string())
            .unwrap_or_default()),
        "backend.timeout_secs" => Ok(config.backend.timeout_secs.to_string()),
        "generation.width" => Ok(config.generation.width.to_string()),
        "generation.height" => Ok(config.generation.height.to_string()),
        "generation.steps" => Ok(config.generation.steps.to_string()),
        "generation.guidance_scale" => Ok(config.generation.guidance_scale.to_string()),
        "generation.negative_prompt" => Ok(config.generation.negative_prompt.clone()),
        "output.directory" => Ok(config.output.directory.display().to_string()),
        "enhancer.places" => Ok(config.enhancer.places.join(", ")),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    if let Some(category) = key.strip_prefix("enhancer.features.") {
        let category: SceneCategory = category.parse().map_err(anyhow::Error::msg)?;
        let phrases = split_list(value, PHRASE_SEPARATOR);
        config.enhancer.features.insert(category, phrases);
        return Ok(());
    }

    match key {
        "daemon.host" => config.daemon.host = value.to_string(),
        "daemon.port" => config.daemon.port = value.parse()?,
        "daemon.monitor_interval_secs" => config.daemon.monitor_interval_secs = value.parse()?,
        "backend.url" => config.backend.url = value.to_string(),
        "backend.api_key" => {
            config.backend.api_key = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        }
        "backend.timeout_secs" => config.backend.timeout_secs = value.parse()?,
        "generation.width" => config.generation.width = value.parse()?,
        "generation.height" => config.generation.height = value.parse()?,
        "generation.steps" => config.generation.steps = value.parse()?,
        "generation.guidance_scale" => config.generation.guidance_scale = value.parse()?,
        "generation.negative_prompt" => config.generation.negative_prompt = value.to_string(),
        "output.directory" => config.output.directory = value.into(),
        "enhancer.places" => config.enhancer.places = split_list(value, ','),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
    Ok(())
}

fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let mut config = Config::default();
        for (key, value) in [
            ("daemon.port", "9100"),
            ("generation.steps", "45"),
            ("generation.negative_prompt", "people, text"),
            ("backend.url", "http://gpu-box:7860/generate"),
            ("output.directory", "renders"),
        ] {
            set_config_value(&mut config, key, value).unwrap();
            assert_eq!(get_config_value(&config, key).unwrap(), value);
        }
    }

    #[test]
    fn api_key_is_masked() {
        let mut config = Config::default();
        assert_eq!(get_config_value(&config, "backend.api_key").unwrap(), "");
        set_config_value(&mut config, "backend.api_key", "secret").unwrap();
        assert_eq!(config.backend.api_key.as_deref(), Some("secret"));
        assert_eq!(get_config_value(&config, "backend.api_key").unwrap(), "***");
    }

    #[test]
    fn sets_feature_phrases() {
        let mut config = Config::default();
        set_config_value(
            &mut config,
            "enhancer.features.highway",
            "toll plazas; sound walls ;",
        )
        .unwrap();
        assert_eq!(
            config.enhancer.features.phrases(SceneCategory::Highway).unwrap(),
            ["toll plazas".to_string(), "sound walls".to_string()]
        );
        assert_eq!(
            get_config_value(&config, "enhancer.features.highway").unwrap(),
            "toll plazas; sound walls"
        );
        assert!(set_config_value(&mut config, "enhancer.features.motorway", "a; b").is_err());
    }

    #[test]
    fn sets_places() {
        let mut config = Config::default();
        set_config_value(&mut config, "enhancer.places", "Lisbon, Porto,").unwrap();
        assert_eq!(config.enhancer.places, vec!["Lisbon", "Porto"]);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_numbers() {
        let mut config = Config::default();
        assert!(get_config_value(&config, "daemon.colour").is_err());
        assert!(set_config_value(&mut config, "daemon.colour", "red").is_err());
        assert!(set_config_value(&mut config, "daemon.port", "not-a-port").is_err());
    }
}
