pub mod assignment;
pub mod monitor;
pub mod state;
