//! Human-readable rendering of crawl results and history

use crate::output::CrawlAggregate;
use crate::storage::HistoryRecord;

/// Prints a crawl aggregate to stdout in a formatted manner
///
/// # Arguments
///
/// * `aggregate` - The finished crawl's totals
/// * `verbose` - Also list every failed, invalid and extension-less URL
pub fn print_aggregate(aggregate: &CrawlAggregate, verbose: bool) {
    println!("=== Crawl Results ===\n");

    println!("Overview:");
    println!("  From: {}", aggregate.from_url);
    println!("  Saved to: {}", aggregate.save_path.display());
    println!("  Pages visited: {}", aggregate.pages_visited);
    println!("  Links found: {}", aggregate.urls_found);
    println!(
        "  Required time: {:.2}s",
        aggregate.elapsed_ms as f64 / 1000.0
    );
    println!();

    println!("Downloads:");
    println!("  Processed: {}", aggregate.processed);
    println!("  Downloaded: {}", aggregate.succeeded);
    println!("  Failed: {}", aggregate.failed);
    println!("  Invalid URLs: {}", aggregate.invalid);
    println!("  Without extension: {}", aggregate.no_extension);
    println!();

    println!("Pruning:");
    println!("  Small files removed: {}", aggregate.small_files_removed);
    println!("  Duplicates removed: {}", aggregate.duplicates_removed);
    println!("  Files kept: {}", aggregate.files_kept());
    println!();

    if !aggregate.page_failures.is_empty() {
        println!("Unreachable Pages ({}):", aggregate.page_failures.len());
        for failure in &aggregate.page_failures {
            println!("  - {} ({})", failure.url, failure.reason);
        }
        println!();
    }

    if !aggregate.prune_failures.is_empty() {
        println!("Pruning Errors ({}):", aggregate.prune_failures.len());
        for failure in &aggregate.prune_failures {
            println!("  - {} ({})", failure.path.display(), failure.reason);
        }
        println!();
    }

    if verbose {
        print_url_list("Failed URLs", &aggregate.failed_urls);
        print_url_list("Invalid URLs", &aggregate.invalid_urls);
        print_url_list("URLs Without Extension", &aggregate.no_extension_urls);
    }
}

fn print_url_list(title: &str, urls: &[String]) {
    if urls.is_empty() {
        return;
    }

    println!("{} ({}):", title, urls.len());
    for url in urls {
        println!("  - {}", url);
    }
    println!();
}

/// Prints recorded crawl requests, newest first
pub fn print_history(records: &[HistoryRecord]) {
    println!("=== Crawl History ===\n");

    if records.is_empty() {
        println!("No crawls recorded.");
        return;
    }

    for record in records {
        let outcome = match &record.result {
            Some(result) => format!(
                "{} downloaded, {} failed, {} duplicates removed",
                result.succeeded, result.failed, result.duplicates_removed
            ),
            None => "no result".to_string(),
        };

        println!(
            "  #{} {} {} -> {}",
            record.id,
            record.requested_at,
            record.url,
            record.save_path.display()
        );
        println!("      {}", outcome);
    }
}
