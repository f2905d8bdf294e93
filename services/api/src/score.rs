use crate::infra::in_memory_receipt_service;
use clap::Args;
use receipt_points::config::AppConfig;
use receipt_points::error::AppError;
use receipt_points::receipts::{PointsBreakdown, ReceiptId, ReceiptSubmission, StoredReceipt};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Receipt JSON files in the same shape accepted by POST /receipts/process
    #[arg(required = true)]
    pub(crate) files: Vec<PathBuf>,
    /// Print the points earned by each rule
    #[arg(long)]
    pub(crate) breakdown: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = in_memory_receipt_service(&config.receipts);

    let mut breakdowns = HashMap::new();
    let mut rejected = 0usize;

    println!("Scoring {} receipt file(s)", args.files.len());
    for path in &args.files {
        let outcome = read_submission(path).and_then(|submission| {
            let receipt = service
                .guard()
                .receipt_from_submission(submission)
                .map_err(|rejection| AppError::Receipt(rejection.into()))?;
            let breakdown = service.breakdown(&receipt);
            let processed = service.process(receipt)?;
            Ok((processed.id, breakdown))
        });

        match outcome {
            Ok((id, breakdown)) => {
                breakdowns.insert(id, (path.clone(), breakdown));
            }
            Err(err) => {
                rejected += 1;
                println!("- {}: {}", path.display(), err);
            }
        }
    }

    let snapshot = service.list_all()?;
    render_snapshot(&snapshot, &breakdowns, args.breakdown);

    if rejected > 0 {
        return Err(AppError::Io(io::Error::other(format!(
            "{rejected} of {} receipt file(s) rejected",
            args.files.len()
        ))));
    }
    Ok(())
}

fn read_submission(path: &Path) -> Result<ReceiptSubmission, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn render_snapshot(
    snapshot: &HashMap<ReceiptId, StoredReceipt>,
    breakdowns: &HashMap<ReceiptId, (PathBuf, PointsBreakdown)>,
    show_breakdown: bool,
) {
    if snapshot.is_empty() {
        println!("\nStored receipts: none");
        return;
    }

    let mut entries: Vec<_> = snapshot.values().collect();
    entries.sort_by_key(|record| {
        let source = breakdowns.get(&record.id).map(|(path, _)| path.clone());
        (source, record.id)
    });

    println!("\nStored receipts");
    for record in entries {
        let source = breakdowns
            .get(&record.id)
            .map(|(path, _)| path.display().to_string())
            .unwrap_or_default();
        println!(
            "- {} | {} | {} | {} points",
            record.id, source, record.receipt.retailer, record.points
        );

        if show_breakdown {
            if let Some((_, breakdown)) = breakdowns.get(&record.id) {
                for (rule, points) in breakdown.entries() {
                    println!("    {rule}: {points}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("receipt-points-{}-{name}", process::id()));
        fs::write(&path, contents).expect("fixture written");
        path
    }

    const CORNER_MARKET: &str = r#"{
        "retailer": "M&M Corner Market",
        "purchaseDate": "2022-03-20",
        "purchaseTime": "14:33",
        "items": [
            { "shortDescription": "Gatorade", "price": "2.25" },
            { "shortDescription": "Gatorade", "price": "2.25" },
            { "shortDescription": "Gatorade", "price": "2.25" },
            { "shortDescription": "Gatorade", "price": "2.25" }
        ],
        "total": "9.00"
    }"#;

    #[test]
    fn read_submission_decodes_wire_format() {
        let path = write_fixture("decode.json", CORNER_MARKET);
        let submission = read_submission(&path).expect("decodes");
        assert_eq!(submission.retailer, "M&M Corner Market");
        assert_eq!(submission.items.len(), 4);
        fs::remove_file(path).ok();
    }

    #[test]
    fn run_score_fails_when_any_file_is_rejected() {
        let valid = write_fixture("valid.json", CORNER_MARKET);
        let mismatched = write_fixture(
            "mismatch.json",
            &CORNER_MARKET.replace("\"9.00\"", "\"9.50\""),
        );

        let ok = run_score(ScoreArgs {
            files: vec![valid.clone()],
            breakdown: true,
        });
        assert!(ok.is_ok());

        let err = run_score(ScoreArgs {
            files: vec![valid.clone(), mismatched.clone()],
            breakdown: false,
        })
        .expect_err("mismatched total rejected");
        assert!(err.to_string().contains("1 of 2"));

        fs::remove_file(valid).ok();
        fs::remove_file(mismatched).ok();
    }
}
