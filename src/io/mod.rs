// ============================================================================
// src/io/mod.rs - I/O Subsystem Module
// ============================================================================
pub mod hid;
pub mod log;
