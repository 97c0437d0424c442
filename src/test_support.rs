use std::sync::Mutex;

/// Serialises tests that fork, reap or touch process-wide state (descriptors,
/// working directory). Reaping waits for any child, so two such tests running
/// at once would steal each other's children.
pub static EXEC_LOCK: Mutex<()> = Mutex::new(());

#[cfg(target_os = "linux")]
pub fn open_fd_count() -> usize {
	// The directory handle itself shows up in the listing, equally on every call.
	std::fs::read_dir("/proc/self/fd").unwrap().count()
}
