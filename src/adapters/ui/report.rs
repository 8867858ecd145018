//! Top/bottom ranking tables for density results.

use crate::domain::DensityRecord;
use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{Write, stdout};

const RULE_WIDTH: usize = 80;
const NAME_WIDTH: usize = 45;

/// One table row with its 1-based rank in the full result list.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow<'a> {
    pub rank: usize,
    pub record: &'a DensityRecord,
}

/// First `n` records (highest density), ranked from 1.
pub fn top_ranked(records: &[DensityRecord], n: usize) -> Vec<RankedRow<'_>> {
    records
        .iter()
        .take(n)
        .enumerate()
        .map(|(i, record)| RankedRow { rank: i + 1, record })
        .collect()
}

/// Last `n` records (lowest density), keeping their rank in the full list.
pub fn bottom_ranked(records: &[DensityRecord], n: usize) -> Vec<RankedRow<'_>> {
    let start = records.len().saturating_sub(n);
    records[start..]
        .iter()
        .enumerate()
        .map(|(i, record)| RankedRow {
            rank: start + i + 1,
            record,
        })
        .collect()
}

fn format_row(row: &RankedRow<'_>) -> String {
    let name: String = row.record.msa_name.chars().take(NAME_WIDTH).collect();
    format!(
        "{:<6} {:<width$} {:>13} {:>10.2}",
        row.rank,
        name,
        row.record.institution_count,
        row.record.institutions_per_100k,
        width = NAME_WIDTH
    )
}

fn print_table(out: &mut impl Write, title: &str, rows: &[RankedRow<'_>], accent: Color) {
    let rule = "=".repeat(RULE_WIDTH);
    let _ = out.execute(SetForegroundColor(accent));
    let _ = out.execute(Print(format!("\r\n{}\r\n{}\r\n{}\r\n", rule, title, rule)));
    let _ = out.execute(ResetColor);
    let _ = out.execute(Print(format!(
        "{:<6} {:<width$} {:>13} {:>10}\r\n{}\r\n",
        "Rank",
        "MSA",
        "Institutions",
        "Per 100k",
        "-".repeat(RULE_WIDTH),
        width = NAME_WIDTH
    )));
    for row in rows {
        let _ = out.execute(Print(format!("{}\r\n", format_row(row))));
    }
}

/// Prints the top-`n` and bottom-`n` tables to stdout.
pub fn print_rankings(records: &[DensityRecord], n: usize) {
    let mut out = stdout();
    print_table(
        &mut out,
        &format!("TOP {} MSAs BY COMPETITION DENSITY", n),
        &top_ranked(records, n),
        Color::Green,
    );
    print_table(
        &mut out,
        &format!("BOTTOM {} MSAs BY COMPETITION DENSITY", n),
        &bottom_ranked(records, n),
        Color::Yellow,
    );
    let _ = out.execute(Print(format!("\r\n{}\r\n", "=".repeat(RULE_WIDTH))));
    let _ = out.flush();
}
