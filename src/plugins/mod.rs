pub mod camera;
pub mod controls;
pub mod hud;
pub mod spacetime;
pub mod visualization;
