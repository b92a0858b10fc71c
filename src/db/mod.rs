pub mod connection;
pub mod movement;
pub mod store;
