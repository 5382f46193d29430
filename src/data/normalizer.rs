/// Provider rows to canonical destination rows.
///
/// All provider-format variance stops here: the synchronizer only ever sees
/// canonical rows keyed by the fixed-width local-time string.
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::types::{Bar, LabeledBar, CANONICAL_TIMESTAMP_FORMAT};

/// Canonical local-time string for a UTC instant.
///
/// The output is fixed-width and zero-padded, which makes lexicographic
/// order on the strings equal to chronological order. The watermark
/// comparison in the synchronizer depends on this.
pub fn canonical_timestamp(timestamp: DateTime<Utc>, zone: Tz) -> String {
    timestamp
        .with_timezone(&zone)
        .format(CANONICAL_TIMESTAMP_FORMAT)
        .to_string()
}

/// Convert a fetched batch into destination rows, label left empty
pub fn normalize_batch(batch: &[Bar], zone: Tz) -> Vec<LabeledBar> {
    batch
        .iter()
        .map(|bar| LabeledBar {
            timestamp: canonical_timestamp(bar.timestamp, zone),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            label: String::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Sao_Paulo;

    fn bar_at(epoch: i64) -> Bar {
        Bar {
            timestamp: DateTime::<Utc>::from_timestamp(epoch, 0).unwrap(),
            open: 36.1,
            high: 36.4,
            low: 36.0,
            close: 36.2,
            volume: 1500,
        }
    }

    #[test]
    fn test_utc_converted_to_local_zone() {
        // 2024-03-01 13:00:00 UTC is 10:00:00 in São Paulo (UTC-3)
        let utc = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();
        assert_eq!(canonical_timestamp(utc, Sao_Paulo), "2024-03-01 10:00:00");
    }

    #[test]
    fn test_format_is_zero_padded() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 2, 12, 5, 9).unwrap();
        assert_eq!(canonical_timestamp(utc, Sao_Paulo), "2024-01-02 09:05:09");
    }

    #[test]
    fn test_lexicographic_order_equals_chronological_order() {
        let instants = [
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 13, 9, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 13, 10, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 2, 13, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 12, 31, 13, 0, 0).unwrap(),
        ];

        let strings: Vec<String> = instants
            .iter()
            .map(|t| canonical_timestamp(*t, Sao_Paulo))
            .collect();

        for pair in strings.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_normalize_keeps_order_and_empty_label() {
        let batch = vec![bar_at(1_709_294_400), bar_at(1_709_294_460)];

        let rows = normalize_batch(&batch, Sao_Paulo);

        assert_eq!(rows.len(), 2);
        assert!(rows[0].timestamp < rows[1].timestamp);
        assert!(rows.iter().all(|r| r.label.is_empty()));
        assert_eq!(rows[0].open, 36.1);
        assert_eq!(rows[0].volume, 1500);
    }

    #[test]
    fn test_cells_in_worksheet_column_order() {
        let rows = normalize_batch(&[bar_at(1_709_294_400)], Sao_Paulo);
        let cells = rows[0].to_cells();

        assert_eq!(cells.len(), 7);
        assert_eq!(cells[0], rows[0].timestamp);
        assert_eq!(cells[1], "36.1");
        assert_eq!(cells[5], "1500");
        assert_eq!(cells[6], "");
    }
}
