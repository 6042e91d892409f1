pub mod modules;
pub mod search;
