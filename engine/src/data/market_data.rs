// In-memory store of daily series, one per symbol
use shared::models::{PriceBar, PriceSeries};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SeriesStore {
    data: HashMap<String, Vec<PriceBar>>,
}

impl SeriesStore {
    pub fn new() -> Self {
        SeriesStore { data: HashMap::new() }
    }

    /// Merges `new_bars` into the symbol's series. Bars are kept sorted by
    /// date; on a duplicate date the bar stored first wins.
    pub fn add_bars(&mut self, symbol: &str, new_bars: Vec<PriceBar>) -> usize {
        let bars = self.data.entry(symbol.to_string()).or_default();
        bars.extend(new_bars);
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        bars.len()
    }

    pub fn get_series(&self, symbol: &str) -> Option<PriceSeries> {
        self.data
            .get(symbol)
            .map(|bars| PriceSeries::new(symbol, bars.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::create_bar;

    #[test]
    fn test_add_bars_sorts_and_dedups() {
        let mut store = SeriesStore::new();
        assert_eq!(store.add_bars("AAA", vec![create_bar(2, 12.0), create_bar(0, 10.0)]), 2);
        assert_eq!(store.add_bars("AAA", vec![create_bar(1, 11.0), create_bar(2, 99.0)]), 3);

        let series = store.get_series("AAA").unwrap();
        assert_eq!(series.symbol, "AAA");
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_unknown_symbol() {
        let mut store = SeriesStore::new();
        store.add_bars("BBB", vec![create_bar(0, 10.0)]);
        store.add_bars("AAA", Vec::new());
        assert!(store.get_series("CCC").is_none());
        assert!(store.get_series("AAA").unwrap().is_empty());
        assert_eq!(store.get_series("BBB").unwrap().len(), 1);
    }
}
