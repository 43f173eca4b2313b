pub mod alphabet;
pub mod alphabets;
pub mod config;
pub mod error;
pub mod ngram;
pub mod optimizer;
pub mod scorer;
// cmd and reports are binary modules (declared in main.rs).
