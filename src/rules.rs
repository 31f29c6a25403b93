pub mod dice;
pub mod modifier;
