//! Physically simulated six-sided die.
//!
//! Throw the die, let Rapier bring it to rest, read the face pointing up.
//! Everything lives under [`dice3d`]; add [`dice3d::DieRollerPlugin`] to a
//! Bevy app with the default plugins to get the full scene.

pub mod dice3d;
