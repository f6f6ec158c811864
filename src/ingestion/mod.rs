pub mod enrich;
pub mod table;

pub use enrich::{enrich_table, EnrichedTrades, Exclusion, REQUIRED_COLUMNS};
pub use table::TradeTable;
