//! Simulated emulator threads that log across every category, for trying the
//! viewer without an emulator attached.
use crate::logging::{LogCategory, LogRouter, Severity};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

const MESSAGES: &[&str] = &[
    "frame {} presented",
    "DVD read of sector {}",
    "pad status polled ({} bytes)",
    "EXI transfer of {} bytes",
    "audio buffer underrun after {} samples",
    "rollback of {} frames",
    "memory card block {} written",
    "shader cache miss #{}",
];

pub struct DemoProducers {
    stop: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl DemoProducers {
    pub fn spawn(router: Arc<LogRouter>, threads: usize) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let handles = (0..threads)
            .filter_map(|id| {
                let router = router.clone();
                let stop = stop.clone();
                std::thread::Builder::new()
                    .name(format!("demo-producer-{}", id))
                    .spawn(move || produce(&router, &stop))
                    .map_err(|e| warn!("Failed to start demo producer {}: {}", id, e))
                    .ok()
            })
            .collect::<Vec<_>>();
        info!("Started {} demo producers", handles.len());
        Self { stop, handles }
    }

    pub fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        for handle in self.handles {
            let _ = handle.join();
        }
        debug!("Demo producers stopped");
    }
}

fn pick_severity(rng: &mut impl Rng) -> Severity {
    match rng.gen_range(0..100) {
        0..=4 => Severity::Error,
        5..=14 => Severity::Warning,
        15..=44 => Severity::Notice,
        45..=74 => Severity::Info,
        _ => Severity::Debug,
    }
}

fn produce(router: &LogRouter, stop: &AtomicBool) {
    let categories: Vec<LogCategory> = LogCategory::all().collect();
    let mut rng = rand::thread_rng();
    let mut counter: u64 = 0;

    while !stop.load(Ordering::Relaxed) {
        counter += 1;
        let category = categories
            .choose(&mut rng)
            .copied()
            .unwrap_or(LogCategory::Master);
        let severity = pick_severity(&mut rng);
        let template = MESSAGES.choose(&mut rng).copied().unwrap_or("tick {}");

        if counter % 25 == 0 {
            // Host diagnostics take the tracing path into the router.
            info!(category = "SLIPPI", notice = true, "demo heartbeat {}", counter);
        } else if router.is_active(category, severity) {
            let value: u32 = rng.gen_range(1..4096);
            let text = template.replacen("{}", &value.to_string(), 1);
            router.publish(category, severity, &text);
        }

        std::thread::sleep(Duration::from_millis(rng.gen_range(20..400)));
    }
}
