//! Domain models for the Fishing Vessel Settlement Platform

pub mod crew;
pub mod fish_type;
pub mod settlement;
pub mod trip;
pub mod vessel;
pub mod weekly;

pub use crew::*;
pub use fish_type::*;
pub use settlement::*;
pub use trip::*;
pub use vessel::*;
pub use weekly::*;
