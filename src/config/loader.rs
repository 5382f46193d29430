/// Configuration loading from TOML file
use std::path::Path;
use crate::error::{Result, CollectorError};
use crate::types::Config;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CollectorError::ConfigError(format!("Failed to read config file: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CollectorError::ConfigError(format!("Failed to parse config: {}", e)))?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.symbol.is_empty() {
        return Err(CollectorError::ConfigError("symbol is empty".to_string()));
    }

    if config.spreadsheet_id.is_empty() {
        return Err(CollectorError::ConfigError("spreadsheet_id is empty".to_string()));
    }

    if config.worksheet.is_empty() {
        return Err(CollectorError::ConfigError("worksheet is empty".to_string()));
    }

    if config.poll_interval_sec == 0 {
        return Err(CollectorError::ConfigError(
            "poll_interval_sec must be >= 1".to_string()
        ));
    }

    if config.local_zone().is_none() {
        return Err(CollectorError::ConfigError(
            format!("Unknown timezone: {}", config.timezone)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_toml() -> String {
        r#"
            symbol = "PETR4.SA"
            spreadsheet_id = "1AbCdEf"
            worksheet = "Sheet1"
            credentials_file = "creds.json"
            poll_interval_sec = 60
            timezone = "America/Sao_Paulo"
        "#
        .to_string()
    }

    #[test]
    fn test_parse_and_validate() {
        let config: Config = toml::from_str(&base_toml()).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.symbol, "PETR4.SA");
        assert_eq!(config.local_zone().unwrap(), chrono_tz::America::Sao_Paulo);
    }

    #[test]
    fn test_rejects_bad_timezone() {
        let toml_str = base_toml().replace("America/Sao_Paulo", "Mars/Olympus");
        let config: Config = toml::from_str(&toml_str).unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_interval() {
        let toml_str = base_toml().replace("poll_interval_sec = 60", "poll_interval_sec = 0");
        let config: Config = toml::from_str(&toml_str).unwrap();
        assert!(validate_config(&config).is_err());
    }
}
