use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

pub const MAIN_THREAD_ID: u64 = 1;

#[derive(Debug)]
pub struct ThreadEntry {
    pub id: u64,
    pub name: String,
    interrupted: AtomicBool,
}

impl ThreadEntry {
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }
}

static THREADS: LazyLock<RwLock<HashMap<u64, Arc<ThreadEntry>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(MAIN_THREAD_ID + 1);

/// Hands out ids for new Java threads; id 1 belongs to `main`.
pub fn next_thread_id() -> u64 {
    NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed)
}

pub fn add_thread(id: u64, name: &str) -> Arc<ThreadEntry> {
    let entry = Arc::new(ThreadEntry {
        id,
        name: name.to_string(),
        interrupted: AtomicBool::new(false),
    });
    debug!("thread {} ({}) started", id, name);
    THREADS.write().insert(id, entry.clone());
    entry
}

pub fn remove_thread(id: u64) -> Option<Arc<ThreadEntry>> {
    let removed = THREADS.write().remove(&id);
    if removed.is_some() {
        debug!("thread {} removed", id);
    }
    removed
}

pub fn get_thread(id: u64) -> Option<Arc<ThreadEntry>> {
    THREADS.read().get(&id).cloned()
}

pub fn get_thread_name(id: u64) -> String {
    match get_thread(id) {
        Some(entry) => entry.name.clone(),
        None if id == MAIN_THREAD_ID => "main".to_string(),
        None => format!("Thread-{}", id),
    }
}

/// Raises the interrupt flag the interpreter polls between instructions.
pub fn interrupt(id: u64) -> bool {
    match get_thread(id) {
        Some(entry) => {
            entry.interrupted.store(true, Ordering::Release);
            true
        }
        None => false,
    }
}

/// Reads and optionally clears the flag, as `Thread.interrupted()` does.
pub fn is_interrupted(id: u64, clear: bool) -> bool {
    match get_thread(id) {
        Some(entry) if clear => entry.interrupted.swap(false, Ordering::AcqRel),
        Some(entry) => entry.is_interrupted(),
        None => false,
    }
}

pub fn thread_count() -> usize {
    THREADS.read().len()
}
