use std::fmt;

use metrics::counter;

use super::table::TradeTable;
use crate::detection::coercer::{coerce_number, coerce_text, parse_list_field};
use crate::detection::normalizer::normalize_instrument;
use crate::errors::DetectError;
use crate::models::{Direction, Trade};

pub const COL_TRADE_ID: &str = "tradehash";
pub const COL_DIRECTION: &str = "short_long";
pub const COL_INSTRUMENT: &str = "asset";
pub const COL_ENTRY_TIMES: &str = "entry_datetimes";
pub const COL_ENTRY_FILLS: &str = "market_entries";
pub const COL_CLOSE_TIMES: &str = "close_datetimes";
pub const COL_CLOSE_FILLS: &str = "market_closes";
pub const COL_ACCOUNT: &str = "account_id";
pub const COL_ACTOR: &str = "user_id";
pub const COL_PROFIT: &str = "net_profit";
pub const COL_QUANTITY: &str = "total_contracts";
pub const COL_ENTRY_PRICE: &str = "avg_market_entry";
pub const COL_CLOSE_PRICE: &str = "avg_market_close";

/// Columns every trade table must carry, in validation order.
pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_TRADE_ID,
    COL_DIRECTION,
    COL_INSTRUMENT,
    COL_ENTRY_TIMES,
    COL_ENTRY_FILLS,
    COL_CLOSE_TIMES,
    COL_CLOSE_FILLS,
    COL_ACCOUNT,
    COL_ACTOR,
    COL_PROFIT,
    COL_QUANTITY,
    COL_ENTRY_PRICE,
    COL_CLOSE_PRICE,
];

/// Reason a row is kept out of matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    MissingField(&'static str),
    InvalidDirection,
    NoEntryTime,
    NoCloseTime,
    NonNumeric(&'static str),
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::MissingField(col) => write!(f, "missing {col}"),
            Exclusion::InvalidDirection => write!(f, "direction is neither LONG nor SHORT"),
            Exclusion::NoEntryTime => write!(f, "no parseable entry timestamp"),
            Exclusion::NoCloseTime => write!(f, "no parseable close timestamp"),
            Exclusion::NonNumeric(col) => write!(f, "non-numeric {col}"),
        }
    }
}

/// Trades eligible for matching, plus how many rows were dropped.
#[derive(Debug, Clone, Default)]
pub struct EnrichedTrades {
    pub trades: Vec<Trade>,
    pub excluded: usize,
}

fn text(table: &TradeTable, row: usize, column: &'static str) -> Result<String, Exclusion> {
    coerce_text(table.cell(row, column)).ok_or(Exclusion::MissingField(column))
}

fn number(table: &TradeTable, row: usize, column: &'static str) -> Result<f64, Exclusion> {
    coerce_number(table.cell(row, column)).ok_or(Exclusion::NonNumeric(column))
}

/// Validate and type a single row.
pub fn enrich_row(table: &TradeTable, row: usize) -> Result<Trade, Exclusion> {
    // Every required field must be present before anything is coerced.
    for &column in REQUIRED_COLUMNS {
        if table.cell(row, column).is_null() {
            return Err(Exclusion::MissingField(column));
        }
    }

    let direction = Direction::from_field(&text(table, row, COL_DIRECTION)?)
        .ok_or(Exclusion::InvalidDirection)?;

    let entry_ms = parse_list_field(table.cell(row, COL_ENTRY_TIMES))
        .first_number()
        .ok_or(Exclusion::NoEntryTime)?;
    let close_ms = parse_list_field(table.cell(row, COL_CLOSE_TIMES))
        .first_number()
        .ok_or(Exclusion::NoCloseTime)?;

    let instrument = text(table, row, COL_INSTRUMENT)?;

    Ok(Trade {
        trade_id: text(table, row, COL_TRADE_ID)?,
        direction,
        canonical_instrument: normalize_instrument(&instrument),
        instrument,
        entry_ms,
        close_ms,
        entry_price: number(table, row, COL_ENTRY_PRICE)?,
        close_price: number(table, row, COL_CLOSE_PRICE)?,
        net_profit: number(table, row, COL_PROFIT)?,
        actor_id: text(table, row, COL_ACTOR)?,
        account_id: text(table, row, COL_ACCOUNT)?,
        quantity: number(table, row, COL_QUANTITY)?,
    })
}

/// Check the table shape, then type every row. Rows that fail coercion are
/// skipped, not fatal.
pub fn enrich_table(table: &TradeTable) -> Result<EnrichedTrades, DetectError> {
    table.require_columns(REQUIRED_COLUMNS)?;

    let mut enriched = EnrichedTrades::default();
    for row in 0..table.len() {
        match enrich_row(table, row) {
            Ok(trade) => enriched.trades.push(trade),
            Err(reason) => {
                tracing::debug!(row = row + 1, %reason, "Trade excluded from matching");
                enriched.excluded += 1;
            }
        }
    }

    counter!("trades_excluded").increment(enriched.excluded as u64);
    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const HEADER: &str = "tradehash,short_long,asset,entry_datetimes,market_entries,close_datetimes,market_closes,account_id,user_id,net_profit,total_contracts,avg_market_entry,avg_market_close";

    fn table(rows: &[&str]) -> TradeTable {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        TradeTable::from_csv_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_valid_row() {
        let t = table(&[
            r#"h1,LONG,MNQM5,"[1000, 2000]","[100]","[5000]","[101]",a1,u1,12.5,2,100.25,101.0"#,
        ]);
        let trade = enrich_row(&t, 0).unwrap();
        assert_eq!(trade.trade_id, "h1");
        assert_eq!(trade.direction, Direction::Long);
        assert_eq!(trade.instrument, "MNQM5");
        assert_eq!(trade.canonical_instrument, "NQ");
        assert_eq!(trade.entry_ms, 1000.0);
        assert_eq!(trade.close_ms, 5000.0);
        assert_eq!(trade.entry_price, 100.25);
        assert_eq!(trade.quantity, 2.0);
    }

    #[test]
    fn test_exclusion_reasons() {
        let t = table(&[
            r#"h1,LONG,NQ,"[1000]","[1]",,"[1]",a1,u1,1,1,100,100"#,
            r#"h2,FLAT,NQ,"[1000]","[1]","[2000]","[1]",a1,u1,1,1,100,100"#,
            r#"h3,LONG,NQ,"[]","[1]","[2000]","[1]",a1,u1,1,1,100,100"#,
            r#"h4,LONG,NQ,"[x, 1]","[1]","[2000]","[1]",a1,u1,1,1,100,100"#,
            r#"h5,LONG,NQ,"[1000]","[1]","[2000]","[1]",a1,u1,1,1,abc,100"#,
            r#"h6,SHORT,NQ,"[1000]","[1]","[oops]","[1]",a1,u1,1,1,100,100"#,
        ]);
        assert_eq!(enrich_row(&t, 0), Err(Exclusion::MissingField(COL_CLOSE_TIMES)));
        assert_eq!(enrich_row(&t, 1), Err(Exclusion::InvalidDirection));
        assert_eq!(enrich_row(&t, 2), Err(Exclusion::NoEntryTime));
        assert_eq!(enrich_row(&t, 3), Err(Exclusion::NoEntryTime));
        assert_eq!(enrich_row(&t, 4), Err(Exclusion::NonNumeric(COL_ENTRY_PRICE)));
        assert_eq!(enrich_row(&t, 5), Err(Exclusion::NoCloseTime));

        let enriched = enrich_table(&t).unwrap();
        assert!(enriched.trades.is_empty());
        assert_eq!(enriched.excluded, 6);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let t = TradeTable::from_csv_reader("tradehash,short_long\nh1,LONG\n".as_bytes()).unwrap();
        match enrich_table(&t) {
            Err(DetectError::MissingColumn(col)) => assert_eq!(col, "asset"),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn test_structured_json_timestamps() {
        let row = serde_json::json!({
            "tradehash": "h1", "short_long": "SHORT", "asset": "ESU4",
            "entry_datetimes": [1000, 1500], "market_entries": [1],
            "close_datetimes": [3000], "market_closes": [1],
            "account_id": 9, "user_id": 4, "net_profit": -3.5,
            "total_contracts": 1, "avg_market_entry": 5000.5, "avg_market_close": "5001"
        });
        let t = TradeTable::from_json_rows(vec![row.as_object().cloned().unwrap()]);
        let trade = enrich_row(&t, 0).unwrap();
        assert_eq!(trade.canonical_instrument, "ES");
        assert_eq!(trade.entry_ms, 1000.0);
        assert_eq!(trade.actor_id, "4");
        assert_eq!(trade.close_price, 5001.0);
        assert_eq!(t.cell(0, "nothing"), &Value::Null);
    }
}
