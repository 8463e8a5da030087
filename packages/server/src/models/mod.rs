pub mod dish;
pub mod ingredient;
pub mod pages;
pub mod shared;
