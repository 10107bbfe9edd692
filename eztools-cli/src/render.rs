//! Plain-text rendering of tax results and tool history.

use std::fmt::Write;

use chrono::Local;
use eztools_core::{History, TaxResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::format::{format_millions, format_percent, format_rate, format_vnd};

/// One bar of the per-bracket tax chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub label: String,
    pub tax: Decimal,
}

/// Brackets that carry tax, labelled `Bậc n`.
pub fn chart_series(result: &TaxResult) -> Vec<ChartPoint> {
    result
        .active_brackets()
        .map(|b| ChartPoint {
            label: format!("Bậc {}", b.number()),
            tax: b.tax,
        })
        .collect()
}

/// Summary block. The union fee line only appears when a fee was charged.
pub fn summary(result: &TaxResult) -> String {
    let mut rows = vec![
        ("Tổng thu nhập", format_vnd(result.gross_income)),
        ("Bảo hiểm bắt buộc", format_vnd(result.insurance.total)),
        ("  BHXH", format_vnd(result.insurance.social)),
        ("  BHYT", format_vnd(result.insurance.health)),
        ("  BHTN", format_vnd(result.insurance.unemployment)),
    ];
    if result.union_fee > Decimal::ZERO {
        rows.push(("Công đoàn phí", format_vnd(result.union_fee)));
    }
    rows.extend([
        ("Thu nhập sau bảo hiểm", format_vnd(result.income_after_contributions)),
        ("Giảm trừ gia cảnh", format_vnd(result.family_deduction)),
        ("Thu nhập tính thuế", format_vnd(result.taxable_income)),
        ("Thuế TNCN phải nộp", format_vnd(result.total_tax)),
        ("Thuế suất thực tế", format_percent(result.effective_rate_percent)),
    ]);

    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<label_width$}  {value:>value_width$}");
    }
    out
}

/// Breakdown table with one row per configured bracket and a total row.
pub fn bracket_table(result: &TaxResult) -> String {
    let header = ["Bậc", "Phạm vi", "Thuế suất", "Chịu thuế", "Nộp"];
    let mut rows: Vec<[String; 5]> = result
        .brackets
        .iter()
        .map(|b| {
            [
                b.number().to_string(),
                b.label.clone(),
                format_rate(b.rate),
                format_vnd(b.taxable_amount),
                format_vnd(b.tax),
            ]
        })
        .collect();
    rows.push([
        String::new(),
        "Tổng".to_string(),
        String::new(),
        format_vnd(result.taxable_income),
        format_vnd(result.total_tax),
    ]);

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>w0$}  {:<w1$}  {:>w2$}  {:>w3$}  {:>w4$}",
        header[0],
        header[1],
        header[2],
        header[3],
        header[4],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
        w4 = widths[4],
    );
    let _ = writeln!(out, "{}", "-".repeat(widths.iter().sum::<usize>() + 8));
    for row in &rows {
        let _ = writeln!(
            out,
            "{:>w0$}  {:<w1$}  {:>w2$}  {:>w3$}  {:>w4$}",
            row[0],
            row[1],
            row[2],
            row[3],
            row[4],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
            w4 = widths[4],
        );
    }
    out
}

/// Horizontal bar chart of [`chart_series`], scaled so the largest bar is
/// `width` cells long. Empty when no bracket carries tax.
pub fn chart(
    result: &TaxResult,
    width: usize,
) -> String {
    let series = chart_series(result);
    let Some(largest) = series.iter().map(|p| p.tax).max() else {
        return String::new();
    };
    let label_width = series.iter().map(|p| p.label.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for point in &series {
        // Ratio first: tax times width can overflow for huge incomes.
        let cells = (point.tax / largest * Decimal::from(width))
            .round()
            .to_usize()
            .unwrap_or(0)
            .max(1);
        let _ = writeln!(
            out,
            "{:<label_width$} | {} {}",
            point.label,
            "█".repeat(cells),
            format_millions(point.tax)
        );
    }
    out
}

/// One line per entry, newest first, in local time.
pub fn history(history: &History) -> String {
    if history.is_empty() {
        return "No history yet\n".to_string();
    }
    let mut out = String::new();
    for entry in history.entries() {
        let _ = writeln!(
            out,
            "[{}] {}: {}",
            entry.timestamp.with_timezone(&Local).format("%d/%m/%Y %H:%M:%S"),
            entry.tool,
            entry.result
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use eztools_core::{TaxConfig, TaxInput, ToolKind, compute_tax};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn forty_million_one_dependent() -> TaxResult {
        compute_tax(&TaxInput::from_gross(dec!(40000000), 1), &TaxConfig::default())
    }

    #[test]
    fn test_chart_series_only_active_brackets() {
        let series = chart_series(&forty_million_one_dependent());

        assert_eq!(
            series,
            vec![
                ChartPoint {
                    label: "Bậc 1".to_string(),
                    tax: dec!(500000),
                },
                ChartPoint {
                    label: "Bậc 2".to_string(),
                    tax: dec!(410000),
                },
            ]
        );
    }

    #[test]
    fn test_chart_series_empty_below_allowance() {
        let result = compute_tax(&TaxInput::from_gross(dec!(10000000), 0), &TaxConfig::default());

        assert!(chart_series(&result).is_empty());
        assert_eq!(chart(&result, 20), "");
    }

    #[test]
    fn test_chart_scales_to_largest_bar() {
        let text = chart(&forty_million_one_dependent(), 10);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("Bậc 1 | {} 0.5M", "█".repeat(10)));
        assert_eq!(lines[1], format!("Bậc 2 | {} 0.4M", "█".repeat(8)));
    }

    #[test]
    fn test_chart_handles_largest_representable_income() {
        let input = TaxInput::from_gross(dec!(9999999999999999999999999999), 0);
        let text = chart(&compute_tax(&input, &TaxConfig::default()), 40);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[4].starts_with(&format!("Bậc 5 | {} ", "█".repeat(40))));
    }

    #[test]
    fn test_summary_lists_totals() {
        let text = summary(&forty_million_one_dependent());

        assert!(text.contains("40.000.000 VNĐ"));
        assert!(text.contains("4.200.000 VNĐ"));
        assert!(text.contains("910.000 VNĐ"));
        assert!(text.contains("2.28%"));
        assert!(!text.contains("Công đoàn phí"));
    }

    #[test]
    fn test_summary_shows_union_fee_when_charged() {
        let input = TaxInput::from_gross(dec!(40000000), 1).with_union_fee(true);
        let text = summary(&compute_tax(&input, &TaxConfig::default()));

        assert!(text.contains("Công đoàn phí"));
        assert!(text.contains("200.000 VNĐ"));
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(history(&History::new()), "No history yet\n");
    }

    #[test]
    fn test_history_lines_newest_first() {
        let mut entries = History::new();
        entries.record(ToolKind::YesNo, "YES");
        entries.record(ToolKind::SpinWheel, "Item 2");

        let text = history(&entries);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] Spin Wheel: Item 2"));
        assert!(lines[1].ends_with("] Yes/No: YES"));
    }

    #[test]
    fn test_bracket_table_has_every_bracket_and_total() {
        let text = bracket_table(&forty_million_one_dependent());
        let lines: Vec<&str> = text.lines().collect();

        // header, rule, five brackets, total
        assert_eq!(lines.len(), 8);
        assert!(lines[2].contains("≤ 10 triệu"));
        assert!(lines[2].contains("5%"));
        assert!(lines[2].contains("500.000 VNĐ"));
        assert!(lines[6].contains("> 100 triệu"));
        assert!(lines[6].contains("35%"));
        assert!(lines[7].contains("Tổng"));
        assert!(lines[7].ends_with("910.000 VNĐ"));
    }
}
