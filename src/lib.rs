// Configuration (TOML file + environment overrides)
pub mod config;

// Entity store and runtime counters
pub mod state;

// Alert rule engine
pub mod alerts;

// Periodic plant simulation
pub mod simulation;

// Subscriber registry and push loop
pub mod subscription;

// HTTP and WebSocket APIs
pub mod api;
