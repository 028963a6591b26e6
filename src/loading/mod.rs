pub mod edb;
