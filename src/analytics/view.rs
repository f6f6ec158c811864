use crate::models::{HedgePair, HedgeType};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Discovery order.
    #[default]
    Id,
    ConfidenceDesc,
    ConfidenceAsc,
    TimeDesc,
    TimeAsc,
}

impl SortOrder {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "id" => Some(SortOrder::Id),
            "confidence-desc" => Some(SortOrder::ConfidenceDesc),
            "confidence-asc" => Some(SortOrder::ConfidenceAsc),
            "time-desc" => Some(SortOrder::TimeDesc),
            "time-asc" => Some(SortOrder::TimeAsc),
            _ => None,
        }
    }
}

/// Analyst-side selection over a pair list.
#[derive(Debug, Clone, PartialEq)]
pub struct PairQuery {
    /// `None` keeps both hedge types.
    pub hedge_type: Option<HedgeType>,
    pub min_confidence: f64,
    pub sort: SortOrder,
    /// 1-based.
    pub page: usize,
    /// `None` returns every matching pair on one page.
    pub page_size: Option<usize>,
}

impl Default for PairQuery {
    fn default() -> Self {
        Self {
            hedge_type: None,
            min_confidence: 0.0,
            sort: SortOrder::Id,
            page: 1,
            page_size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairPage {
    pub pairs: Vec<HedgePair>,
    /// Pairs passing the filters, before pagination.
    pub total_matching: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// Filter, sort and paginate. Ties keep discovery order.
pub fn select(pairs: &[HedgePair], query: &PairQuery) -> PairPage {
    let mut matching: Vec<&HedgePair> = pairs
        .iter()
        .filter(|p| query.hedge_type.map_or(true, |t| p.hedge_type == t))
        .filter(|p| p.confidence >= query.min_confidence)
        .collect();

    match query.sort {
        SortOrder::Id => matching.sort_by_key(|p| p.id),
        SortOrder::ConfidenceDesc => matching.sort_by(|a, b| b.confidence.total_cmp(&a.confidence)),
        SortOrder::ConfidenceAsc => matching.sort_by(|a, b| a.confidence.total_cmp(&b.confidence)),
        SortOrder::TimeDesc => matching.sort_by(|a, b| {
            b.trade1
                .entry_timestamp_ms
                .total_cmp(&a.trade1.entry_timestamp_ms)
        }),
        SortOrder::TimeAsc => matching.sort_by(|a, b| {
            a.trade1
                .entry_timestamp_ms
                .total_cmp(&b.trade1.entry_timestamp_ms)
        }),
    }

    let total_matching = matching.len();
    let page = query.page.max(1);

    let (selected, total_pages) = match query.page_size {
        Some(size) if size > 0 => {
            let total_pages = total_matching.div_ceil(size).max(1);
            let start = (page - 1).saturating_mul(size);
            let selected = matching.into_iter().skip(start).take(size).cloned().collect();
            (selected, total_pages)
        }
        _ => (matching.into_iter().cloned().collect(), 1),
    };

    PairPage {
        pairs: selected,
        total_matching,
        page,
        total_pages,
    }
}
