pub mod controller;
pub mod face;
pub mod plugin;
pub mod session;
pub mod systems;
pub mod textures;
pub mod types;
pub mod world;

pub use controller::*;
pub use face::*;
pub use plugin::*;
pub use session::*;
pub use systems::*;
pub use textures::*;
pub use types::*;
pub use world::*;
