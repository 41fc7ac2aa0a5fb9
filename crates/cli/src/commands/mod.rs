pub mod catalog;
pub mod replay;
