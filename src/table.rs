//! Table aligner: merges several series into a common recent-period
//! matrix for tabular display.

use std::fmt;

use num_format::{Locale, ToFormattedString};

use crate::models::Series;

/// Number of recent periods shown in an aligned table.
pub const DEFAULT_WINDOW: usize = 13;

/// How present cells are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Fixed two decimals with a `%` suffix, for rate indicators.
    Percent,
    /// Grouped decimal, for index levels and other plain magnitudes.
    Grouped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub entity: String,
    pub cells: Vec<String>,
}

/// Entity rows against period-label columns; absent values are empty
/// cells, never errors.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable {
    pub columns: Vec<String>,
    pub rows: Vec<AlignedRow>,
}

impl AlignedTable {
    /// True when no entity produced any value — the page-level "no
    /// data" fallback case.
    pub fn is_blank(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.cells.iter().all(String::is_empty))
    }
}

/// Align entities into a common recent-period window.
///
/// Entities are scanned in caller order; the first with a non-empty
/// series supplies the canonical columns: its most recent `window`
/// dates, labeled at its own frequency. Every entity's values are then
/// placed positionally most-recent-first against those columns, padded
/// with blanks. Alignment is by position, not by matching calendar
/// period, so mixed-frequency series can carry another frequency's
/// labels.
pub fn align(entries: &[(String, Series)], window: usize, style: CellStyle) -> AlignedTable {
    let columns: Vec<String> = entries
        .iter()
        .map(|(_, series)| series)
        .find(|series| !series.is_empty())
        .map(|series| {
            series
                .observations
                .iter()
                .rev()
                .take(window)
                .map(|o| series.frequency.period_label(o.date))
                .collect()
        })
        .unwrap_or_default();

    let rows = entries
        .iter()
        .map(|(entity, series)| {
            // Observations are ascending, so reverse iteration walks the
            // series most-recent-first.
            let mut cells: Vec<String> = series
                .observations
                .iter()
                .rev()
                .take(columns.len())
                .map(|o| format_cell(o.value, style))
                .collect();
            cells.resize(columns.len(), String::new());
            AlignedRow {
                entity: entity.clone(),
                cells,
            }
        })
        .collect();

    AlignedTable { columns, rows }
}

/// Render one optional value. Absent (or non-finite) values become the
/// empty cell.
pub fn format_cell(value: Option<f64>, style: CellStyle) -> String {
    match value {
        Some(v) if v.is_finite() => match style {
            CellStyle::Percent => format!("{v:.2}%"),
            CellStyle::Grouped => format_grouped(v),
        },
        _ => String::new(),
    }
}

/// Grouped-decimal rendering at two decimals, e.g. `21,433,226` or
/// `316.55`. Integer values drop the fraction.
fn format_grouped(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let magnitude = rounded.abs();
    let mut int_part = magnitude.trunc() as i64;
    let mut frac_part = ((magnitude - magnitude.trunc()) * 100.0).round() as i64;
    if frac_part >= 100 {
        int_part += 1;
        frac_part = 0;
    }

    let mut out = int_part.to_formatted_string(&Locale::en);
    if frac_part != 0 {
        out.push_str(&format!(".{frac_part:02}"));
    }
    if negative {
        out.insert(0, '-');
    }
    out
}

impl fmt::Display for AlignedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entity_width = self
            .rows
            .iter()
            .map(|r| r.entity.len())
            .max()
            .unwrap_or(0)
            .max(7);
        let col_widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, label)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.cells.get(i))
                    .map(String::len)
                    .max()
                    .unwrap_or(0)
                    .max(label.len())
            })
            .collect();

        write!(f, "{:<entity_width$}", "Country")?;
        for (label, w) in self.columns.iter().zip(col_widths.iter().copied()) {
            write!(f, "  {label:>w$}")?;
        }
        writeln!(f)?;
        for row in &self.rows {
            write!(f, "{:<entity_width$}", row.entity)?;
            for (cell, w) in row.cells.iter().zip(col_widths.iter().copied()) {
                write!(f, "  {cell:>w$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_formatting() {
        assert_eq!(format_cell(Some(21_433_226.0), CellStyle::Grouped), "21,433,226");
        assert_eq!(format_cell(Some(316.549), CellStyle::Grouped), "316.55");
        assert_eq!(format_cell(Some(-0.37), CellStyle::Grouped), "-0.37");
        assert_eq!(format_cell(Some(2.999), CellStyle::Grouped), "3");
        assert_eq!(format_cell(None, CellStyle::Grouped), "");
    }

    #[test]
    fn percent_formatting_round_trips() {
        let cell = format_cell(Some(3.14159), CellStyle::Percent);
        assert_eq!(cell, "3.14%");
        let back: f64 = cell.trim_end_matches('%').parse().unwrap();
        assert!((back - 3.14159).abs() < 0.005);
        assert_eq!(format_cell(Some(f64::NAN), CellStyle::Percent), "");
    }
}
