//! Runtime — logging init and engine assembly.

pub mod boot;

pub use boot::Engine;
