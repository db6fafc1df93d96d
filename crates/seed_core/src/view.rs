//! Display-ready projections of the result store. Pure; the GUI only paints these.

use crate::model::{SeedResult, Summary};
use crate::store::ResultStore;

pub const TABLE_HEADERS: [&str; 6] = [
    "Seed ID",
    "Classification",
    "Confidence",
    "Severity",
    "Pest Count",
    "Holes Detected",
];

/// An sRGB colour for chart elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Slice colours by position.
pub const SEVERITY_PALETTE: [Rgb; 4] = [
    Rgb(0x4c, 0xaf, 0x50),
    Rgb(0xff, 0x98, 0x00),
    Rgb(0xf4, 0x43, 0x36),
    Rgb(0x9c, 0x27, 0xb0),
];
/// Fill for slices past the palette.
pub const DEFAULT_SLICE_FILL: Rgb = Rgb(0x88, 0x84, 0xd8);
pub const PEST_BAR_FILL: Rgb = Rgb(0x82, 0xca, 0x9d);

/// Percentage text with two decimals, e.g. `0.97` -> `97.00%`.
/// Ties round away from zero, so `0.91125` shows as `91.13%`.
pub fn format_confidence(confidence: f64) -> String {
    let percent = confidence * 100.0;
    format!("{:.2}%", (percent * 100.0).round() / 100.0)
}

/// Shortest decimal form, so `50.0` prints as `50` and `1.5` as `1.5`.
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub seed_id: String,
    pub classification: String,
    pub confidence: String,
    pub severity: String,
    pub pest_count: String,
    pub holes_detected: String,
}

impl TableRow {
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.seed_id,
            &self.classification,
            &self.confidence,
            &self.severity,
            &self.pest_count,
            &self.holes_detected,
        ]
    }
}

impl From<&SeedResult> for TableRow {
    fn from(r: &SeedResult) -> Self {
        Self {
            seed_id: r.seed_id.to_string(),
            classification: r.classification.clone(),
            confidence: format_confidence(r.confidence),
            severity: r.severity.to_string(),
            pest_count: r.pest_count.to_string(),
            holes_detected: r.holes_detected.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
    pub color: Rgb,
}

impl PieSlice {
    /// Share of the whole pie in [0,1].
    pub fn fraction(&self, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.value as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub category: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub figures: [String; 3],
    pub slices: Vec<PieSlice>,
}

impl SummaryView {
    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

/// Everything the results screen shows, in render order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultView {
    pub rows: Vec<TableRow>,
    pub summary: Option<SummaryView>,
    pub bars: Vec<Bar>,
}

impl ResultView {
    pub fn from_store(store: &ResultStore) -> Self {
        let results = store.results();
        Self {
            rows: results.iter().map(TableRow::from).collect(),
            summary: store.summary().map(summary_view),
            bars: pest_bars(results),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn summary_view(summary: &Summary) -> SummaryView {
    SummaryView {
        figures: [
            format!("Total Seeds: {}", summary.total_seeds),
            format!(
                "Damaged Percentage: {}%",
                format_number(summary.damaged_percentage)
            ),
            format!(
                "Average Pest Count: {}",
                format_number(summary.avg_pest_count)
            ),
        ],
        slices: severity_slices(summary),
    }
}

pub fn severity_slices(summary: &Summary) -> Vec<PieSlice> {
    summary
        .severity_distribution
        .iter()
        .enumerate()
        .map(|(idx, (label, &value))| PieSlice {
            label: format!("Severity {label}"),
            value,
            color: SEVERITY_PALETTE
                .get(idx)
                .copied()
                .unwrap_or(DEFAULT_SLICE_FILL),
        })
        .collect()
}

pub fn pest_bars(results: &[SeedResult]) -> Vec<Bar> {
    results
        .iter()
        .map(|r| Bar {
            category: r.filename.clone(),
            value: r.pest_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::two_seed_batch;
    use crate::model::{AnalysisBatch, Summary};
    use rstest::rstest;
    use std::collections::BTreeMap;

    #[rstest]
    #[case(0.97, "97.00%")]
    #[case(0.81, "81.00%")]
    #[case(1.0, "100.00%")]
    #[case(0.0, "0.00%")]
    #[case(0.5, "50.00%")]
    #[case(0.91125, "91.13%")]
    #[case(0.00125, "0.13%")]
    fn confidence_is_percent_with_two_decimals(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_confidence(value), expected);
        assert_eq!(format_confidence(value), format_confidence(value));
    }

    #[test]
    fn empty_store_renders_nothing() {
        let view = ResultView::from_store(&ResultStore::default());
        assert!(view.is_empty());
        assert!(view.summary.is_none());
        assert!(view.bars.is_empty());
    }

    #[test]
    fn two_seed_batch_view() {
        let mut store = ResultStore::default();
        store.replace(two_seed_batch());
        let view = ResultView::from_store(&store);

        assert_eq!(view.rows.len(), 2);
        assert_eq!(
            view.rows[0].cells(),
            ["1", "Healthy", "97.00%", "None", "0", "0"]
        );
        assert_eq!(view.rows[1].confidence, "81.00%");

        let summary = view.summary.as_ref().unwrap();
        assert_eq!(
            summary.figures,
            [
                "Total Seeds: 2".to_string(),
                "Damaged Percentage: 50%".to_string(),
                "Average Pest Count: 1.5".to_string(),
            ]
        );
        let labels: Vec<_> = summary.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Severity High", "Severity None"]);
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.slices[0].fraction(summary.total()), 0.5);

        let bars: Vec<_> = view.bars.iter().map(|b| (b.category.as_str(), b.value)).collect();
        assert_eq!(bars, vec![("a.jpg", 0), ("b.jpg", 3)]);
    }

    #[test]
    fn rendering_twice_is_identical() {
        let mut store = ResultStore::default();
        store.replace(two_seed_batch());
        assert_eq!(ResultView::from_store(&store), ResultView::from_store(&store));
    }

    #[test]
    fn slices_past_palette_use_default_fill() {
        let (results, _) = two_seed_batch().into_parts();
        let summary = Summary {
            total_seeds: 2,
            damaged_percentage: 50.0,
            avg_pest_count: 1.5,
            severity_distribution: (0..6).map(|i| (i.to_string(), 1)).collect::<BTreeMap<_, _>>(),
        };
        let batch = AnalysisBatch::new(results, summary).unwrap();
        let slices = severity_slices(batch.summary());
        assert_eq!(slices.len(), 6);
        assert_eq!(slices[0].color.hex(), "#4caf50");
        assert_eq!(slices[3].color.hex(), "#9c27b0");
        assert_eq!(slices[4].color, DEFAULT_SLICE_FILL);
        assert_eq!(slices[5].color.hex(), "#8884d8");
        assert_eq!(slices[2].label, "Severity 2");
    }
}
