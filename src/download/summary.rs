//! Download run statistics

use crate::crawler::CrawlStats;

/// What a download run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Records received from the listing
    pub records_seen: u64,

    /// Files written to disk
    pub files_written: u64,

    /// Records whose asset could not be fetched or was empty
    pub skipped: u64,

    /// Total bytes written
    pub bytes_written: u64,
}

/// Prints the summary of a run to stdout
pub fn print_summary(summary: &DownloadSummary, crawl: Option<&CrawlStats>) {
    println!("=== Download Summary ===\n");

    if let Some(crawl) = crawl {
        println!("Listing:");
        println!("  Pages fetched: {}", crawl.pages_fetched);
        println!("  Records listed: {}", crawl.records_yielded);
        println!(
            "  Time spent in backoff: {:?} ({} waits)",
            crawl.total_delay, crawl.delays_waited
        );
        if crawl.ended_without_data {
            println!("  Note: the last page request returned no data");
        }
        println!();
    }

    println!("Assets:");
    println!("  Records seen: {}", summary.records_seen);
    println!("  Files written: {}", summary.files_written);
    println!("  Skipped: {}", summary.skipped);
    println!("  Bytes written: {}", summary.bytes_written);

    let success_rate = if summary.records_seen > 0 {
        (summary.files_written as f64 / summary.records_seen as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "\nSuccess Rate: {:.1}% ({} / {} assets written)",
        success_rate, summary.files_written, summary.records_seen
    );
}
