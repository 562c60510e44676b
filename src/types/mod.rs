pub mod coords;
pub mod workout;
