// Screening of a watchlist: per-instrument evaluation, ranking and the market filter
pub mod classifier;

pub use classifier::{build_report, classify, classify_at, cross_at, cross_events, market_regime};

use crate::config::{IndicatorSettings, ScreenerSettings};
use crate::error::Result;
use crate::indicators::IndicatorFrame;
use shared::models::{InstrumentReport, PriceSeries, RankBy, ScreeningReport, SkippedInstrument};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Screener {
    indicators: IndicatorSettings,
    settings: ScreenerSettings,
}

impl Screener {
    pub fn new(indicators: IndicatorSettings, settings: ScreenerSettings) -> Self {
        Screener { indicators, settings }
    }

    pub fn settings(&self) -> &ScreenerSettings {
        &self.settings
    }

    /// Frame and report for one instrument. Errors only concern this instrument.
    pub fn evaluate(&self, series: &PriceSeries) -> Result<InstrumentReport> {
        let frame = IndicatorFrame::compute(series, &self.indicators)?;
        build_report(&frame, self.settings.display_name(&series.symbol))
    }

    /// Screens the watchlist against the series at hand. Symbols without a series are skipped.
    pub fn screen(&self, available: &HashMap<String, PriceSeries>) -> ScreeningReport {
        let outcomes = self
            .settings
            .watchlist
            .iter()
            .map(|symbol| (symbol.clone(), available.get(symbol).map(|series| self.evaluate(series))))
            .collect();
        self.assemble(outcomes)
    }

    /// Builds the report from per-instrument outcomes given in watchlist order.
    /// `None` means no market data was available for the symbol.
    pub fn assemble(&self, outcomes: Vec<(String, Option<Result<InstrumentReport>>)>) -> ScreeningReport {
        let mut report = ScreeningReport::default();

        for (symbol, outcome) in outcomes {
            match outcome {
                Some(Ok(instrument)) => report.reports.push(instrument),
                Some(Err(e)) => {
                    tracing::warn!(symbol = %symbol, error = %e, "Skipping instrument");
                    report.skipped.push(SkippedInstrument { symbol, reason: e.to_string() });
                }
                None => {
                    tracing::warn!(symbol = %symbol, "No market data for instrument");
                    report.skipped.push(SkippedInstrument {
                        symbol,
                        reason: "no market data available".to_string(),
                    });
                }
            }
        }

        report.candidates = rank_candidates(&report.reports, self.settings.rank_by, self.settings.top_n);
        report.regime = self.settings.benchmark.as_ref().and_then(|benchmark| {
            report
                .reports
                .iter()
                .find(|r| &r.symbol == benchmark)
                .map(|r| market_regime(&r.classification))
        });

        tracing::info!(
            classified = report.reports.len(),
            candidates = report.candidates.len(),
            skipped = report.skipped.len(),
            regime = ?report.regime,
            "Screening pass complete"
        );
        report
    }
}

/// Strong instruments sorted by `rank_by` descending, capped at `top_n`. Ties keep input order.
pub fn rank_candidates(reports: &[InstrumentReport], rank_by: RankBy, top_n: usize) -> Vec<InstrumentReport> {
    let key = |r: &InstrumentReport| match rank_by {
        RankBy::Rsi => r.rsi,
        RankBy::Histogram => r.histogram,
        RankBy::Change => r.change,
    };
    let mut candidates: Vec<InstrumentReport> = reports
        .iter()
        .filter(|r| r.classification.strong == Some(true))
        .cloned()
        .collect();
    candidates.sort_by(|a, b| key(b).total_cmp(&key(a)));
    candidates.truncate(top_n);
    candidates
}
