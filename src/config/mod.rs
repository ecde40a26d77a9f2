use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Complete SteelPulse configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SteelPulseConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
}

/// HTTP/WebSocket listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Simulation tick configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Period between ticks (milliseconds)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Multiplier on every bounded noise term (0.0 = deterministic)
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f64,
    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_tick_interval_ms() -> u64 {
    2000
}

fn default_noise_scale() -> f64 {
    1.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            noise_scale: default_noise_scale(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Subscriber push configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    /// Period between snapshot pushes to each subscriber (milliseconds)
    #[serde(default = "default_push_interval_ms")]
    pub push_interval_ms: u64,
}

fn default_push_interval_ms() -> u64 {
    2000
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            push_interval_ms: default_push_interval_ms(),
        }
    }
}

impl BroadcastConfig {
    pub fn push_interval(&self) -> Duration {
        Duration::from_millis(self.push_interval_ms)
    }
}

/// Production metrics history bounds
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Hard cap on stored samples
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
    /// Samples kept after an overflow trim
    #[serde(default = "default_history_retain")]
    pub retain: usize,
    /// Samples returned per query
    #[serde(default = "default_query_tail")]
    pub query_tail: usize,
}

fn default_history_capacity() -> usize {
    1000
}

fn default_history_retain() -> usize {
    500
}

fn default_query_tail() -> usize {
    24
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
            retain: default_history_retain(),
            query_tail: default_query_tail(),
        }
    }
}

/// Alert rule configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertConfig {
    /// Minimum seconds between over-temperature alerts for one furnace.
    /// 0 disables suppression: every breaching tick raises an alert.
    #[serde(default)]
    pub furnace_cooldown_secs: u64,
}

/// Largest cooldown a millisecond-precision `chrono::Duration` can hold
pub const MAX_FURNACE_COOLDOWN_SECS: u64 = i64::MAX as u64 / 1000;

impl SteelPulseConfig {
    /// Apply environment variable overrides, ignoring unparseable values
    pub fn apply_env(mut self) -> Self {
        if let Ok(v) = std::env::var("STEELPULSE_BIND") {
            if !v.is_empty() {
                self.server.bind = v;
            }
        }
        if let Ok(v) = std::env::var("STEELPULSE_TICK_INTERVAL_MS") {
            if let Ok(n) = v.parse::<u64>() {
                self.simulation.tick_interval_ms = n;
            }
        }
        if let Ok(v) = std::env::var("STEELPULSE_PUSH_INTERVAL_MS") {
            if let Ok(n) = v.parse::<u64>() {
                self.broadcast.push_interval_ms = n;
            }
        }
        if let Ok(v) = std::env::var("STEELPULSE_NOISE_SCALE") {
            if let Ok(f) = v.parse::<f64>() {
                self.simulation.noise_scale = f;
            }
        }
        if let Ok(v) = std::env::var("STEELPULSE_SEED") {
            if let Ok(n) = v.parse::<u64>() {
                self.simulation.seed = Some(n);
            }
        }

        self
    }

    /// Reject settings the runtime cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.simulation.tick_interval_ms == 0 {
            bail!("simulation.tick_interval_ms must be greater than 0");
        }
        if self.broadcast.push_interval_ms == 0 {
            bail!("broadcast.push_interval_ms must be greater than 0");
        }
        if !self.simulation.noise_scale.is_finite() || self.simulation.noise_scale < 0.0 {
            bail!("simulation.noise_scale must be a finite non-negative number");
        }
        if self.history.capacity == 0 {
            bail!("history.capacity must be greater than 0");
        }
        if self.history.retain == 0 || self.history.retain > self.history.capacity {
            bail!("history.retain must be between 1 and history.capacity");
        }
        if self.alerts.furnace_cooldown_secs > MAX_FURNACE_COOLDOWN_SECS {
            bail!(
                "alerts.furnace_cooldown_secs must be at most {}",
                MAX_FURNACE_COOLDOWN_SECS
            );
        }
        Ok(())
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<SteelPulseConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config: SteelPulseConfig =
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file {}", path))?;
    Ok(config)
}

/// Resolve configuration: file named by `STEELPULSE_CONFIG` (or defaults),
/// then environment overrides, then validation
pub fn resolve_config() -> Result<SteelPulseConfig> {
    let config = match std::env::var("STEELPULSE_CONFIG") {
        Ok(path) if !path.is_empty() => load_config(&path)?,
        _ => SteelPulseConfig::default(),
    }
    .apply_env();

    config.validate()?;
    Ok(config)
}
