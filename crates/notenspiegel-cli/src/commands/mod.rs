pub mod catalog;
pub mod check;
pub mod load;
pub mod parse;
