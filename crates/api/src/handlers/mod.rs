pub mod hero;
pub mod team;
