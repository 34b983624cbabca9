use std::path::Path;

use crate::cli::RunConfig;

/// Print the fixed diagnostic block that precedes the tests.
///
/// Pure reporting. Every fact here is best-effort and none of them can fail
/// the run.
pub fn print_environment(config: &RunConfig, session_id: &str) {
    println!("{}", "=".repeat(60));
    println!("ENVIRONMENT");
    println!("{}", "=".repeat(60));
    println!("  Probe version   : {}", crate::VERSION);
    println!("  Client stack    : amiquip (blocking) / lapin (futures)");
    println!("  OS              : {}", std::env::consts::OS);
    println!("  Architecture    : {}", std::env::consts::ARCH);
    println!("  Hostname        : {}", get_hostname());
    println!("  CPU cores       : {}", num_cpus::get());
    println!("  In container    : {}", is_container_environment());
    println!("  Message count   : {}", config.num_messages);
    println!("  Session ID      : {}", session_id);
    println!("  Sockopt policy  : {}", config.policy);
    println!();
}

fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Best-effort container detection.
///
/// Checks the marker files Docker and Podman drop into the root filesystem,
/// then falls back to scanning `/proc/1/cgroup` for runtime names. Any
/// probe failure reads as "not in a container".
pub fn is_container_environment() -> bool {
    if Path::new("/.dockerenv").exists() || Path::new("/run/.containerenv").exists() {
        return true;
    }
    std::fs::read_to_string("/proc/1/cgroup")
        .map(|contents| {
            ["docker", "lxc", "kubepods", "containerd"]
                .iter()
                .any(|marker| contents.contains(marker))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The heuristic must never error, whatever the host looks like.
    #[test]
    fn test_container_detection_is_infallible() {
        let _ = is_container_environment();
    }

    #[test]
    fn test_hostname_is_nonempty() {
        assert!(!get_hostname().is_empty());
    }
}
