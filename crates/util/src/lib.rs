//! Shared plumbing for the frame extractor's binaries: debug logging, saved
//! files, app data paths, thread-to-thread channels and a few UI helpers.

pub mod access;
pub mod channels;
pub mod debug_log;
pub mod drop_join_thread;
pub mod eprint_and_exit;
pub mod local_data;
pub mod saved_file;
pub mod ui;
pub mod version;
