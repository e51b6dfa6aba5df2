// Compact renderings of screening results for downstream consumers
// (narrative generation, notification). No HTML or prompt wording here.
use crate::error::{EngineError, Result};
use shared::models::{InstrumentReport, ScreeningReport, Trend};
use shared::utils::{format_optional, format_signed};

/// One line per instrument, e.g.
/// `TSMC (2330.TW): price 139.00, change +1.00, RSI 100.0 (overbought), MACD bullish, trend bullish (above MA 129.50)`
pub fn summary_line(report: &InstrumentReport) -> String {
    let label = if report.name == report.symbol {
        report.symbol.clone()
    } else {
        format!("{} ({})", report.name, report.symbol)
    };
    let c = &report.classification;
    let position = match c.trend {
        Trend::Bullish => "above",
        Trend::Bearish => "below",
        Trend::Consolidating => "at",
    };

    let mut line = format!(
        "{}: price {:.2}, change {}, RSI {:.1} ({}), MACD {}, trend {} ({} MA {:.2})",
        label,
        report.close,
        format_signed(report.change, 2),
        report.rsi,
        c.rsi_zone,
        c.momentum,
        c.trend,
        position,
        report.ma_mid,
    );
    if let Some(cross) = c.cross {
        line.push_str(&format!(", {}", cross));
    }
    if c.strong == Some(true) {
        line.push_str(&format!(", strong (long MA {})", format_optional(report.ma_long, 2)));
    }
    line
}

/// All classified instruments, one per line, preceded by the market regime when known.
pub fn summary_text(report: &ScreeningReport) -> String {
    let mut lines = Vec::with_capacity(report.reports.len() + 1);
    if let Some(regime) = report.regime {
        lines.push(format!("Market regime: {}", regime));
    }
    lines.extend(report.reports.iter().map(summary_line));
    lines.join("\n")
}

pub fn to_json(report: &ScreeningReport) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| EngineError::ProcessingError(format!("Failed to serialize screening report: {}", e)))
}
