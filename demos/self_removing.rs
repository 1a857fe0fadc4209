//! Tasks that change the task list while they run.

use housekeeper::{Housekeeper, HousekeeperBuilder};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Repeats three times, then unregisters itself
fn countdown(housekeeper: &Housekeeper) -> Result<(), Box<dyn std::error::Error>> {
    let weak = housekeeper.downgrade();
    let remaining = AtomicU32::new(3);
    housekeeper.add_repeated(
        "countdown",
        move || {
            let left = remaining.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
            println!("[COUNTDOWN] {left} left");
            if left == 0 {
                if let Some(hk) = weak.upgrade() {
                    hk.remove("countdown");
                    println!("[COUNTDOWN] removed itself");
                }
            }
        },
        1,
    )?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let housekeeper = HousekeeperBuilder::new().build()?;
    countdown(&housekeeper)?;

    // A one-shot that schedules a follow-up one-shot
    let weak = housekeeper.downgrade();
    let followups = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&followups);
    housekeeper.add_oneshot(
        "stage-1",
        move || {
            println!("[STAGE-1] scheduling stage 2");
            if let Some(hk) = weak.upgrade() {
                let seen = Arc::clone(&seen);
                let _ = hk.add_oneshot(
                    "stage-2",
                    move || {
                        seen.fetch_add(1, Ordering::SeqCst);
                        println!("[STAGE-2] done");
                    },
                    1,
                );
            }
        },
        1,
    )?;

    let handle = housekeeper.start()?;
    std::thread::sleep(Duration::from_secs(6));

    println!("\nRemaining tasks:\n{}", housekeeper.report());
    println!("Stage 2 ran {} time(s)", followups.load(Ordering::SeqCst));
    handle.join()?;
    Ok(())
}
