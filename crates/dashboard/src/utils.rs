use anyhow::Context;
use clap::{command, Parser};
use feeds::FeedsConfig;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::{env, fs, net::SocketAddr, str::FromStr};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

#[derive(Parser, Clone, Debug, Default, serde::Deserialize)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to Settings.toml file holding the rest of the cli options
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Set the log level (default: info)
    #[arg(short, long)]
    pub level: Option<String>,

    /// Host to listen at (default: 127.0.0.1)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Port to listen on (default: 9100)
    #[arg(short, long)]
    pub port: Option<String>,

    /// Path to files used to make the browser UI (default: ./ui)
    #[arg(short, long)]
    pub ui_dir: Option<String>,

    /// OpenWeatherMap api key, required for the weather feed
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub openweather_api_key: Option<String>,

    /// Eventbrite token, events fall back to a static list without it
    #[arg(long, env = "EVENTBRITE_TOKEN", hide_env_values = true)]
    pub eventbrite_token: Option<String>,

    /// Per attempt timeout for upstream requests (default: 10)
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Retries on transient upstream failures (default: 1)
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Feed locations and endpoints, only read from the config file
    #[arg(skip)]
    #[serde(default)]
    pub feeds: FeedsConfig,
}

impl Cli {
    /// Flags and env win over the settings file.
    pub fn merge(self, file: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file.level),
            domain: self.domain.or(file.domain),
            port: self.port.or(file.port),
            ui_dir: self.ui_dir.or(file.ui_dir),
            openweather_api_key: self.openweather_api_key.or(file.openweather_api_key),
            eventbrite_token: self.eventbrite_token.or(file.eventbrite_token),
            request_timeout_secs: self.request_timeout_secs.or(file.request_timeout_secs),
            max_retries: self.max_retries.or(file.max_retries),
            feeds: file.feeds,
        }
    }

    /// Fills credentials from their alternate env names when the primary ones are unset.
    pub fn with_env_aliases(mut self, lookup: impl Fn(&str) -> Option<String>) -> Cli {
        if self.openweather_api_key.is_none() {
            self.openweather_api_key = lookup("OPENWEATHERMAP_API_KEY");
        }
        if self.eventbrite_token.is_none() {
            self.eventbrite_token = lookup("EVENTBRITE_API_KEY");
        }
        self
    }

    pub fn feeds_config(&self) -> FeedsConfig {
        let mut feeds = self.feeds.clone();
        if let Some(api_key) = &self.openweather_api_key {
            feeds.weather.api_key = Some(api_key.clone());
        }
        if let Some(token) = &self.eventbrite_token {
            feeds.events.token = Some(token.clone());
        }
        if let Some(timeout_secs) = self.request_timeout_secs {
            feeds.http.timeout_secs = timeout_secs;
        }
        if let Some(max_retries) = self.max_retries {
            feeds.http.max_retries = max_retries;
        }
        feeds
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, anyhow::Error> {
        let address = format!(
            "{}:{}",
            self.domain.as_deref().unwrap_or("127.0.0.1"),
            self.port.as_deref().unwrap_or("9100")
        );
        SocketAddr::from_str(&address).with_context(|| format!("invalid listen address: {}", address))
    }

    pub fn ui_dir(&self) -> String {
        self.ui_dir.clone().unwrap_or(String::from("./ui"))
    }
}

pub fn get_config_info() -> Result<Cli, anyhow::Error> {
    let cli = Cli::parse().with_env_aliases(|name| env::var(name).ok());

    let Some(config_path) = cli.config.clone() else {
        return Ok(cli);
    };
    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config file: {}", config_path))?;
    let file: Cli = toml::from_str(&content)
        .with_context(|| format!("failed to deserialize config: {}", config_path))?;
    Ok(cli.merge(file))
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    match &cli.level {
        Some(level) => parse_level(level),
        None => parse_level(&env::var("RUST_LOG").unwrap_or_default()),
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc()
                    .format(&Iso8601::DEFAULT)
                    .unwrap_or_default(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
