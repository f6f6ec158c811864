use hedgescan::config::AppConfig;
use hedgescan::detection::{DetectionParams, TimestampZone};
use hedgescan::ingestion::TradeTable;
use hedgescan::AppState;

pub const HEADER: &str = "tradehash,short_long,asset,entry_datetimes,market_entries,close_datetimes,market_closes,account_id,user_id,net_profit,total_contracts,avg_market_entry,avg_market_close";

/// 2024-03-01 14:30:00 UTC
pub const BASE_MS: i64 = 1_709_303_400_000;
pub const MINUTE_MS: i64 = 60_000;

/// One CSV trade row. Times are minutes after `BASE_MS`.
#[allow(dead_code)]
pub struct Row<'a> {
    pub hash: &'a str,
    pub direction: &'a str,
    pub asset: &'a str,
    pub open_min: i64,
    pub close_min: i64,
    pub entry: f64,
    pub close: f64,
    pub user: &'a str,
    pub account: &'a str,
    pub profit: f64,
    pub contracts: f64,
}

#[allow(dead_code)]
impl<'a> Row<'a> {
    pub fn new(hash: &'a str, direction: &'a str, asset: &'a str, entry: f64) -> Self {
        Self {
            hash,
            direction,
            asset,
            open_min: 0,
            close_min: 30,
            entry,
            close: entry,
            user: "user_1",
            account: "acct_1",
            profit: 0.0,
            contracts: 1.0,
        }
    }

    pub fn times(mut self, open_min: i64, close_min: i64) -> Self {
        self.open_min = open_min;
        self.close_min = close_min;
        self
    }

    pub fn owner(mut self, user: &'a str, account: &'a str) -> Self {
        self.user = user;
        self.account = account;
        self
    }

    pub fn contracts(mut self, contracts: f64) -> Self {
        self.contracts = contracts;
        self
    }

    pub fn profit(mut self, profit: f64) -> Self {
        self.profit = profit;
        self
    }

    pub fn close_price(mut self, close: f64) -> Self {
        self.close = close;
        self
    }

    pub fn to_csv(&self) -> String {
        let open = BASE_MS + self.open_min * MINUTE_MS;
        let close = BASE_MS + self.close_min * MINUTE_MS;
        format!(
            "{},{},{},\"[{open}]\",\"[{}]\",\"[{close}]\",\"[{}]\",{},{},{},{},{},{}",
            self.hash,
            self.direction,
            self.asset,
            self.entry,
            self.close,
            self.account,
            self.user,
            self.profit,
            self.contracts,
            self.entry,
            self.close,
        )
    }
}

#[allow(dead_code)]
pub fn csv_text(rows: &[Row<'_>]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(&row.to_csv());
    }
    out.push('\n');
    out
}

#[allow(dead_code)]
pub fn table(rows: &[Row<'_>]) -> TradeTable {
    TradeTable::from_csv_reader(csv_text(rows).as_bytes()).expect("fixture CSV should decode")
}

#[allow(dead_code)]
pub fn params(price_threshold: f64, confidence_threshold: f64, include_close_price: bool) -> DetectionParams {
    DetectionParams {
        price_threshold,
        confidence_threshold,
        include_close_price,
        timestamp_zone: TimestampZone::Utc,
    }
}

/// App state with UTC timestamps and auth disabled.
#[allow(dead_code)]
pub fn test_state() -> AppState {
    let config = AppConfig {
        timestamp_zone: TimestampZone::Utc,
        ..AppConfig::default()
    };

    AppState {
        config,
        metrics_handle: hedgescan::metrics::init_metrics().expect("metrics recorder should install"),
    }
}
