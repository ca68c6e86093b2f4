pub mod game;
pub mod io;
pub mod league;
pub mod schedule;
pub mod team;
pub mod types;
