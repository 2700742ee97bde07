//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `opsdesk_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Why: keep a tiny CLI probe to validate core crate wiring independently
    // from any embedding application.
    println!("opsdesk_core ping={}", opsdesk_core::ping());
    println!("opsdesk_core version={}", opsdesk_core::core_version());
}
