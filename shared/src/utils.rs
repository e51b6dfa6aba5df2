// Display helpers shared by the engine's report output and any consumer of the models.

/// Formats an optional value with a fixed number of decimals, "N/A" when absent.
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.decimals$}", v, decimals = decimals),
        None => "N/A".to_string(),
    }
}

/// Formats a price change with an explicit sign, e.g. "+1.00" or "-0.50".
pub fn format_signed(value: f64, decimals: usize) -> String {
    if value > 0.0 {
        format!("+{:.decimals$}", value, decimals = decimals)
    } else {
        format!("{:.decimals$}", value, decimals = decimals)
    }
}
