pub mod chase;
pub mod reasoner;
pub mod rewrite;
pub mod storage;
