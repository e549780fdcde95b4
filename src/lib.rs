//! Trivia backend: a prefetching Open Trivia DB client with fuzzy answer
//! matching, plus a small HTTP host that serves rounds and grades answers.

pub mod config;
pub mod domain;
pub mod error;
pub mod logic;
pub mod matching;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod telemetry;
pub mod testing;
pub mod trivia;
pub mod util;
