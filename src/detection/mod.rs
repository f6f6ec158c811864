pub mod assembler;
pub mod coercer;
pub mod engine;
pub mod matcher;
pub mod normalizer;
pub mod scorer;

pub use assembler::TimestampZone;
pub use engine::{analyze, detect, find_hedge_pairs, DetectionParams};
pub use normalizer::normalize_instrument;
pub use scorer::confidence_score;
