pub mod error;
pub mod filter;
pub mod frame;
pub mod generator;
pub mod models;
pub mod xoroshiro;

pub use error::RaidError;
pub use filter::{FrameFilter, ShinyFilter};
pub use frame::{shiny_class, Frame, Gender, ShinyClass};
pub use generator::RaidGenerator;
pub use xoroshiro::{day_seed, Xoroshiro, DAY_ADVANCE};
