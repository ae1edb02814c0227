use memora_engine::cards::{CardKind, default_kinds};
use memora_engine::config::{GameConfig, Timing};
use memora_engine::deck::validate_kinds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

pub const DEFAULT_SCORE_FILE: &str = ".memora/scores.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub reveal_delay_ms: u64,
    pub conceal_delay_ms: u64,
    pub score_file: String,
    pub kinds: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub reveal_delay_ms: ValueSource,
    pub conceal_delay_ms: ValueSource,
    pub score_file: ValueSource,
    pub kinds: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            reveal_delay_ms: ValueSource::Default,
            conceal_delay_ms: ValueSource::Default,
            score_file: ValueSource::Default,
            kinds: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            seed: None,
            reveal_delay_ms: timing.reveal_delay.as_millis() as u64,
            conceal_delay_ms: timing.conceal_delay.as_millis() as u64,
            score_file: DEFAULT_SCORE_FILE.into(),
            kinds: default_kinds().into_iter().map(|k| k.name).collect(),
        }
    }
}

impl Config {
    /// Kind names resolved to card kinds; the built-in animals keep their
    /// image assets.
    pub fn card_kinds(&self) -> Vec<CardKind> {
        let builtin = default_kinds();
        self.kinds
            .iter()
            .map(|name| {
                builtin
                    .iter()
                    .find(|k| &k.name == name)
                    .cloned()
                    .unwrap_or_else(|| CardKind::named(name.as_str()))
            })
            .collect()
    }

    pub fn timing(&self) -> Timing {
        Timing {
            reveal_delay: Duration::from_millis(self.reveal_delay_ms),
            conceal_delay: Duration::from_millis(self.conceal_delay_ms),
        }
    }

    /// Engine configuration; `seed` overrides the configured one when given.
    pub fn game_config(&self, seed: Option<u64>) -> GameConfig {
        GameConfig {
            kinds: self.card_kinds(),
            seed: seed.or(self.seed),
            timing: self.timing(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("MEMORA_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.reveal_delay_ms {
            cfg.reveal_delay_ms = v;
            sources.reveal_delay_ms = ValueSource::File;
        }
        if let Some(v) = f.conceal_delay_ms {
            cfg.conceal_delay_ms = v;
            sources.conceal_delay_ms = ValueSource::File;
        }
        if let Some(v) = f.score_file {
            cfg.score_file = v;
            sources.score_file = ValueSource::File;
        }
        if let Some(v) = f.kinds {
            cfg.kinds = v;
            sources.kinds = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("MEMORA_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(ms) = std::env::var("MEMORA_REVEAL_DELAY_MS")
        && !ms.is_empty()
    {
        cfg.reveal_delay_ms = ms
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid reveal delay".into()))?;
        sources.reveal_delay_ms = ValueSource::Env;
    }
    if let Ok(ms) = std::env::var("MEMORA_CONCEAL_DELAY_MS")
        && !ms.is_empty()
    {
        cfg.conceal_delay_ms = ms
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid conceal delay".into()))?;
        sources.conceal_delay_ms = ValueSource::Env;
    }
    if let Ok(path) = std::env::var("MEMORA_SCORE_FILE")
        && !path.is_empty()
    {
        cfg.score_file = path;
        sources.score_file = ValueSource::Env;
    }
    if let Ok(kinds) = std::env::var("MEMORA_KINDS")
        && !kinds.is_empty()
    {
        cfg.kinds = parse_kind_list(&kinds);
        sources.kinds = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    reveal_delay_ms: Option<u64>,
    #[serde(default)]
    conceal_delay_ms: Option<u64>,
    #[serde(default)]
    score_file: Option<String>,
    #[serde(default)]
    kinds: Option<Vec<String>>,
}

/// Splits `"lion, fox,bear"` into names, dropping empty entries.
pub fn parse_kind_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    validate_kinds(&cfg.card_kinds())
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))?;
    if cfg.score_file.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "Invalid configuration: score_file must not be empty".into(),
        ));
    }
    Ok(())
}
