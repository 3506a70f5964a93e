//! JSON serialization for cohort and comparison results.

use serde::Serialize;

use crate::error::Result;

/// Serialize a result record to a compact JSON string.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails, e.g. for a map with non-string keys.
pub fn to_json<T: Serialize + ?Sized>(record: &T) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

/// Serialize a result record to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
pub fn to_json_pretty<T: Serialize + ?Sized>(record: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economics::{CeaRow, Estimate, Icer};
    use crate::statistics::{Interval, SummaryStat};

    fn make_row(icer: Icer) -> CeaRow {
        CeaRow {
            name: "anticoag".to_string(),
            cost: Estimate {
                mean: 25_000.0,
                interval: Interval::new(24_000.0, 26_000.0),
            },
            effect: Estimate {
                mean: 12.5,
                interval: Interval::new(12.0, 13.0),
            },
            icer,
        }
    }

    #[test]
    fn test_to_json() {
        let stat = SummaryStat::compute("survival time", &[10.0, 12.0, 14.0], 0.05).unwrap();
        let json = to_json(&stat).unwrap();
        assert!(json.contains("\"name\":\"survival time\""));
        assert!(json.contains("\"mean\":12.0"));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json_pretty(&make_row(Icer::Dominated)).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"kind\": \"dominated\""));
    }

    #[test]
    fn test_icer_ratio_round_trips() {
        let row = make_row(Icer::Ratio {
            value: 18_000.0,
            interval: Some(Interval::new(9_000.0, 30_000.0)),
        });
        let json = to_json(&row).unwrap();
        let back: CeaRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
