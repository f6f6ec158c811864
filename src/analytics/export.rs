use crate::models::HedgePair;

const EXPORT_HEADER: [&str; 13] = [
    "Pair ID",
    "Type",
    "Instrument",
    "Entry Time 1",
    "Entry Time 2",
    "Entry Price 1",
    "Entry Price 2",
    "Confidence",
    "Net Profit",
    "User ID 1",
    "User ID 2",
    "Account ID 1",
    "Account ID 2",
];

/// Render pairs as a flat CSV table, one row per pair.
pub fn pairs_to_csv(pairs: &[HedgePair]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for pair in pairs {
        writer.write_record([
            pair.id.to_string(),
            pair.hedge_type.to_string(),
            pair.instrument.clone(),
            pair.trade1.entry_time.clone(),
            pair.trade2.entry_time.clone(),
            pair.trade1.entry_price.to_string(),
            pair.trade2.entry_price.to_string(),
            format!("{:.2}", pair.confidence),
            format!("{:.2}", pair.net_profit),
            pair.trade1.actor_id.clone(),
            pair.trade2.actor_id.clone(),
            pair.trade1.account_id.clone(),
            pair.trade2.account_id.clone(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV export: {e}"))
}
