// Module structure for the log-view engine core.

// Collaborator seams
pub mod buffer;
pub mod render;

// Core engine
pub mod event;
pub mod filter;
pub mod format;

// Infrastructure
pub mod conf;
pub mod runtime;
