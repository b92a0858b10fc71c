pub mod category;
pub mod month;
pub mod movement;
