//! A small TTL cache that registers its expiry sweep with the housekeeper.
//!
//! Run with `RUST_LOG=debug cargo run --example expiry-sweep`.

use housekeeper::HousekeeperBuilder;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// In-memory store whose entries go stale after `ttl`
struct TtlCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl TtlCache {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn put(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .insert(key.to_string(), (value.to_string(), Instant::now()));
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Drop every entry older than the TTL, returning how many went
    fn expire(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, (_, stored)| stored.elapsed() < self.ttl);
        before - entries.len()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("🚀 TTL cache with a housekeeper expiry sweep\n");

    let cache = Arc::new(TtlCache::new(Duration::from_secs(2)));
    for i in 0..5 {
        cache.put(&format!("session-{i}"), "payload");
    }

    let housekeeper = HousekeeperBuilder::new().build()?;

    let sweeper = Arc::clone(&cache);
    housekeeper.add_repeated(
        "cache-expiry",
        move || {
            let expired = sweeper.expire();
            if expired > 0 {
                println!("[EXPIRY] removed {expired} stale entries");
            }
        },
        1,
    )?;

    let warm = Arc::clone(&cache);
    housekeeper.add_oneshot(
        "cache-warmup",
        move || {
            warm.put("config", "preloaded");
            println!("[WARMUP] cache primed");
        },
        1,
    )?;

    let handle = housekeeper.start()?;
    println!("{}", housekeeper.report());

    tokio::time::sleep(Duration::from_secs(5)).await;

    println!("\n📊 After 5 seconds:");
    println!("   Entries left: {}", cache.len());
    println!("   Heartbeat: {} ticks", housekeeper.heartbeat());
    println!("{}", housekeeper.report());
    println!("{}", serde_json::to_string_pretty(&housekeeper.report())?);

    handle.shutdown().await?;
    println!("✅ Housekeeper stopped");
    Ok(())
}
