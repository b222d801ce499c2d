//! Drives one spike check and renders its outcome. Intended to be invoked
//! from a cron entry; the process is the delivery channel for any alert.

use crate::cli::ui;
use crate::core::{Direction, SpikeCheck, SpikeDetector};
use anyhow::Result;

pub async fn run_check(detector: &SpikeDetector, currency: &str) -> Result<()> {
    let currency = currency.to_uppercase();
    let pb = ui::new_spinner(&format!("Checking {currency} rate..."));
    let outcome = detector.check(&currency).await;
    pb.finish_and_clear();

    match outcome {
        SpikeCheck::NoData => {
            println!(
                "{}",
                ui::style_text(
                    &format!("No rates available for {currency}; check skipped."),
                    ui::StyleType::Error
                )
            );
        }
        SpikeCheck::Checked {
            current_rate,
            event,
            baseline_persisted,
        } => {
            match event {
                Some(event) => {
                    let direction = match event.direction {
                        Direction::Up => "up",
                        Direction::Down => "down",
                    };
                    let alert = format!(
                        "Rate spike for {}: {} {:.2}% ({:.2} -> {:.2})",
                        event.currency,
                        direction,
                        event.percent_change,
                        event.previous_rate,
                        event.current_rate
                    );
                    println!("{}", ui::style_text(&alert, ui::StyleType::Highlight));
                }
                None => {
                    println!(
                        "No significant change for {currency}; current rate {current_rate:.2}"
                    );
                }
            }

            if !baseline_persisted {
                println!(
                    "{}",
                    ui::style_text(
                        "Warning: the new baseline could not be saved; the next check will compare against the old one.",
                        ui::StyleType::Subtle
                    )
                );
            }
        }
    }

    Ok(())
}
