//! Type definitions for the physical die roller
//!
//! This module is organized into submodules:
//! - `dice` - The die, its face table, roll state, history and messages
//! - `settings` - Live-editable throw and ground parameters
//! - `camera` - Camera marker and trailing constants
//! - `ui` - Control panel and status components

pub mod camera;
pub mod dice;
pub mod settings;
pub mod ui;

// Re-export all public types for convenient access
pub use camera::*;
pub use dice::*;
pub use settings::*;
pub use ui::*;
