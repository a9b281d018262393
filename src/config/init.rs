use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, ApiConfig, Config, SearchConfig, DEFAULT_BASE_URL};
use crate::credentials::{prompt_for_token, ENV_TOKEN_VAR};
use crate::scoring::{default_bands, validate_scoring, Rating, RatingBand, TrustScoreConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

/// Where `init` keeps the API token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStorage {
    /// Read from PROPERTIFI_API_TOKEN at runtime
    Env,
    /// Written into the config file
    Config(String),
    None,
}

/// Everything the wizard asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct InitAnswers {
    pub base_url: String,
    pub token: TokenStorage,
    /// Custom band minimums for Excellent, Good, Fair. `None` keeps the defaults.
    pub band_minimums: Option<[f64; 3]>,
    pub verified_points: Option<f64>,
    pub debounce: String,
}

/// Build the config the answers describe, leaving defaults out of the file.
pub fn config_from_answers(answers: &InitAnswers) -> Config {
    let token = match &answers.token {
        TokenStorage::Config(t) if !t.trim().is_empty() => Some(t.trim().to_string()),
        _ => None,
    };
    let base_url = (answers.base_url != DEFAULT_BASE_URL).then(|| answers.base_url.clone());
    let api = (base_url.is_some() || token.is_some()).then(|| ApiConfig {
        base_url,
        token,
        ..Default::default()
    });

    let scoring = if answers.band_minimums.is_some() || answers.verified_points.is_some() {
        Some(TrustScoreConfig {
            verified_points: answers.verified_points,
            bands: answers.band_minimums.map(|[excellent, good, fair]| {
                vec![
                    RatingBand { min: excellent, rating: Rating::Excellent },
                    RatingBand { min: good, rating: Rating::Good },
                    RatingBand { min: fair, rating: Rating::Fair },
                    RatingBand { min: 0.0, rating: Rating::Poor },
                ]
            }),
            ..Default::default()
        })
    } else {
        None
    };

    let search = (answers.debounce != "300ms").then(|| SearchConfig {
        debounce: Some(answers.debounce.clone()),
    });

    Config {
        api,
        scoring,
        charts: None,
        search,
    }
}

/// Serialize `config` to `path`, replacing any existing file atomically.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config).map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;
    Ok(())
}

fn ask_number(message: &str, default: f64) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<f64>() {
            Ok(v) if (0.0..=100.0).contains(&v) => return Ok(v),
            _ => println!("  Invalid: must be a number between 0 and 100. Try again."),
        }
    }
}

fn ask_answers() -> Result<InitAnswers> {
    // 1. API
    typewriter("Where is the Propertifi API? Local development servers usually listen on port 8000.");
    let base_url = loop {
        let input = prompt_with_default("API base URL", DEFAULT_BASE_URL)?;
        match reqwest::Url::parse(&input) {
            Ok(_) => break input.trim_end_matches('/').to_string(),
            Err(e) => println!("  Invalid URL: {}. Try again.", e),
        }
    };

    // 2. Token
    println!();
    typewriter("Browsing managers needs no token. Manager dashboards (leads, preferences) do.");
    typewriter(&format!(
        "You can keep the token in the config file, or export {} instead.",
        ENV_TOKEN_VAR
    ));
    let token = loop {
        let choice = prompt_with_default("Token storage (config/env/none)", "none")?.to_lowercase();
        match choice.as_str() {
            "config" => {
                let token = prompt_for_token()?;
                break if token.is_empty() {
                    TokenStorage::None
                } else {
                    TokenStorage::Config(token)
                };
            }
            "env" => break TokenStorage::Env,
            "none" => break TokenStorage::None,
            _ => println!("  Please answer config, env or none."),
        }
    };

    // 3. Scoring
    println!();
    typewriter("Managers get a trust score out of 100 from BBB grade, years in business, portfolio size and verification.");
    let (band_minimums, verified_points) = if prompt_yes_no("Use the default trust score settings?", true)? {
        (None, None)
    } else {
        let defaults = default_bands();
        loop {
            let excellent = ask_number("Minimum score for Excellent", defaults[0].min)?;
            let good = ask_number("Minimum score for Good", defaults[1].min)?;
            let fair = ask_number("Minimum score for Fair", defaults[2].min)?;
            let verified = ask_number("Points for a verified manager", 10.0)?;

            let candidate = config_from_answers(&InitAnswers {
                base_url: base_url.clone(),
                token: TokenStorage::None,
                band_minimums: Some([excellent, good, fair]),
                verified_points: Some(verified),
                debounce: "300ms".to_string(),
            });
            match candidate.scoring.as_ref().map(validate_scoring) {
                Some(Err(errors)) => {
                    for e in errors {
                        println!("  Invalid: {}", e);
                    }
                    println!("  Try again.");
                }
                _ => break (Some([excellent, good, fair]), Some(verified)),
            }
        }
    };

    // 4. Search
    println!();
    let debounce = loop {
        let input = prompt_with_default("Search debounce (0s searches on every keystroke)", "300ms")?;
        match humantime::parse_duration(&input) {
            Ok(_) => break input,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    Ok(InitAnswers {
        base_url,
        token,
        band_minimums,
        verified_points,
        debounce,
    })
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("Propertifi Configuration Wizard");
    println!("===============================");
    println!();

    let answers = ask_answers()?;

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    write_config(&config_path, &config_from_answers(&answers))?;

    println!();
    println!("Config written to {}", config_path.display());
    if answers.token == TokenStorage::Env {
        println!("Remember to export {} before using manager commands.", ENV_TOKEN_VAR);
    }
    println!("Run `propertifi` to get started.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::TempDir;

    fn defaults() -> InitAnswers {
        InitAnswers {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: TokenStorage::None,
            band_minimums: None,
            verified_points: None,
            debounce: "300ms".to_string(),
        }
    }

    #[test]
    fn test_default_answers_give_empty_config() {
        assert_eq!(config_from_answers(&defaults()), Config::default());
    }

    #[test]
    fn test_env_token_not_written() {
        let answers = InitAnswers {
            token: TokenStorage::Env,
            ..defaults()
        };
        assert!(config_from_answers(&answers).api.is_none());
    }

    #[test]
    fn test_custom_answers() {
        let answers = InitAnswers {
            base_url: "https://api.propertifi.co/api".into(),
            token: TokenStorage::Config(" secret ".into()),
            band_minimums: Some([85.0, 65.0, 45.0]),
            verified_points: Some(5.0),
            debounce: "0s".into(),
        };
        let config = config_from_answers(&answers);
        assert_eq!(config.api().token.as_deref(), Some("secret"));
        assert_eq!(config.scoring().rating_bands()[1].min, 65.0);
        assert_eq!(config.scoring().rating_bands().len(), 4);
        assert_eq!(config.search().debounce(), Ok(std::time::Duration::ZERO));
        assert!(validate_scoring(&config.scoring()).is_ok());
    }

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.yaml");
        let config = config_from_answers(&InitAnswers {
            base_url: "https://example.com/api".into(),
            verified_points: Some(8.0),
            ..defaults()
        });
        write_config(&path, &config).unwrap();

        let loaded = load_config(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }
}
