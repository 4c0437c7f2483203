pub mod copy;
pub mod export;
pub mod import;

use crate::replicate::{ReplicationReport, SyncOutcome};

fn print_report(action: &str, report: &ReplicationReport) {
    println!(
        "{action}: bucket {}, flow {}, {} version(s) created, {} already present",
        describe(report.bucket),
        describe(report.flow),
        report.versions_created(),
        report.versions_skipped()
    );
}

fn describe(outcome: SyncOutcome) -> &'static str {
    match outcome {
        SyncOutcome::Created => "created",
        SyncOutcome::AlreadyPresent => "already present",
    }
}
