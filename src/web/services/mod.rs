pub mod actions;
pub mod catalog;
pub mod health;
