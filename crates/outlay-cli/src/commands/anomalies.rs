//! Anomaly command implementations (list, review)

use anyhow::Result;
use outlay_core::db::Database;
use outlay_core::detect::AnomalyDetector;

use super::truncate;

pub fn cmd_anomalies_list(db: &Database, profile: Option<&str>, include_reviewed: bool) -> Result<()> {
    let profile = db.resolve_profile(profile)?;
    let anomalies = db.list_anomalies(profile.id, include_reviewed)?;

    if anomalies.is_empty() {
        if include_reviewed {
            println!("No anomalies recorded.");
        } else {
            println!("✅ No unreviewed anomalies. Your spending looks normal!");
        }
        return Ok(());
    }

    println!();
    println!("📊 Spending Anomalies");
    println!("   ─────────────────────────────────────────────────────────────");

    for anomaly in &anomalies {
        let reviewed_mark = if anomaly.is_reviewed {
            if anomaly.is_false_positive {
                " (reviewed: false positive)"
            } else {
                " (reviewed: confirmed)"
            }
        } else {
            ""
        };

        println!(
            "   [{}] {} spike │ confidence {:.0}%{}",
            anomaly.id,
            anomaly.created_at.date_naive(),
            anomaly.confidence * 100.0,
            reviewed_mark
        );
        if let Some(ref expense) = anomaly.expense {
            println!(
                "      ${:.2} │ {} │ {} │ {}",
                expense.amount,
                expense.date,
                expense.category_name.as_deref().unwrap_or("-"),
                truncate(&expense.description, 35)
            );
        }
        println!("      {}", anomaly.description);
        println!();
    }

    if anomalies.iter().any(|a| !a.is_reviewed) {
        println!("   Review with 'outlay anomalies review <id>' (add --false-positive");
        println!("   to clear the flag on the expense).");
    }

    Ok(())
}

pub fn cmd_anomalies_review(db: &Database, id: i64, false_positive: bool) -> Result<()> {
    let detector = AnomalyDetector::new(db);
    let anomaly = detector.review(id, false_positive)?;

    if false_positive {
        println!("✅ Anomaly #{} marked as a false positive.", anomaly.id);
        println!("   The expense flag has been cleared.");
    } else {
        println!("✅ Anomaly #{} confirmed.", anomaly.id);
        println!("   The expense stays flagged for your records.");
    }

    Ok(())
}
