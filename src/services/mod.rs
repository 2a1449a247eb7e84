pub mod diagnostic_logger;
pub mod helix_service;
pub mod live_directory;
pub mod stream_watcher;
