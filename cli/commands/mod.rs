pub mod clear;
pub mod collect;
pub mod config;
pub mod filters;
pub mod folders;
pub mod last;
pub mod menu;
pub mod open;
