//! Combinatorial allocation engine for distributed rendering.
//!
//! Assigns the scenes of rendering tasks to GPU providers, one round at a
//! time, under budget, deadline, and provider-availability constraints.
//! Each round a pluggable strategy proposes a scene → provider combo and a
//! dispatcher turns it into reserved time on the providers' ledgers.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Provider`, `Combo`, `Availability`,
//!   `Reservation`, `Assignment`, `Schedule`, and the input record shapes
//! - **`evaluator`**: Time/cost model, feasibility, and ranking scores
//! - **`strategy`**: Exhaustive, greedy, matching, and integer-programming
//!   strategies behind one trait, plus a registry keyed by name
//! - **`dispatch`**: Earliest-fit reservation of accepted combos
//! - **`session`**: Owns tasks, providers, and emitted records across rounds
//! - **`config`**: Serde-loadable weights and strategy settings
//! - **`validation`**: Input integrity checks
//!
//! # Time
//!
//! Instants are `i64` milliseconds. Durations coming out of the cost model
//! are `f64` hours and are converted with [`models::hours_to_ms`].
//!
//! # Logging
//!
//! The crate emits `tracing` events (mostly `debug!` on verbose paths) and
//! installs no subscriber.
//!
//! # References
//!
//! - Kuhn (1955), "The Hungarian Method for the Assignment Problem"
//! - Wolsey (1998), "Integer Programming"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod config;
pub mod dispatch;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod session;
pub mod strategy;
pub mod validation;

pub use config::EngineConfig;
pub use dispatch::{Dispatcher, SequentialDispatcher};
pub use error::{AllocError, Result};
pub use evaluator::{BaselineEvaluator, Evaluator};
pub use session::AllocationSession;
pub use strategy::{ComboOutcome, ComboStrategy, StrategyRegistry};
