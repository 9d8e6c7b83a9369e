// Library exports for the snake duel engine
// This allows the replay tool and the integration tests to use the core game logic

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod game;
pub mod heuristic;
pub mod pip;
pub mod replay;
pub mod resolver;
pub mod search;
pub mod types;
