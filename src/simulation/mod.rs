// Simulation tick: sole writer of simulated plant values

mod engine;
pub mod model;

pub use engine::{run_simulation, Simulator, TickReport};
