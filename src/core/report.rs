use crate::core::{Ranking, RankingEntry, RankingReport};
use crate::utils::error::{RankError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct LeaderboardRow<'a> {
    rank: usize,
    title: &'a str,
    total: f64,
    link: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    search_query: &'a str,
    ranking: &'a Ranking,
    top: &'a [RankingEntry],
}

/// Renders the leaderboard bodies for a ranking.
///
/// CSV and TSV list `top_n` rows when a limit is given, otherwise every
/// ranked unit. The JSON body always carries the full ranking (or `0`).
pub fn build_report(
    ranking: Ranking,
    search_query: &str,
    top_n: Option<usize>,
    generated_at: DateTime<Utc>,
) -> Result<RankingReport> {
    let top = match top_n {
        Some(n) => ranking.top(n).to_vec(),
        None => ranking.entries().to_vec(),
    };

    let csv_output = render_delimited(&top, b',')?;
    let tsv_output = render_delimited(&top, b'\t')?;
    let json_output = serde_json::to_string_pretty(&JsonReport {
        generated_at,
        search_query,
        ranking: &ranking,
        top: &top,
    })?;

    Ok(RankingReport {
        ranking,
        top,
        generated_at,
        csv_output,
        tsv_output,
        json_output,
    })
}

fn render_delimited(entries: &[RankingEntry], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    if entries.is_empty() {
        // serialize() only emits the header alongside the first row
        writer.write_record(["rank", "title", "total", "link"])?;
    }

    for (index, entry) in entries.iter().enumerate() {
        writer.serialize(LeaderboardRow {
            rank: index + 1,
            title: &entry.title,
            total: entry.total,
            link: &entry.link,
        })?;
    }

    let bytes = writer.into_inner().map_err(|e| RankError::ProcessingError {
        message: format!("Failed to flush leaderboard: {}", e),
    })?;

    String::from_utf8(bytes).map_err(|e| RankError::ProcessingError {
        message: format!("Leaderboard is not valid UTF-8: {}", e),
    })
}
