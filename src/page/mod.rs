pub mod index;
pub mod menu;
