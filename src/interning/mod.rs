pub mod dictionary;
pub mod hash;
