pub mod asm;
pub mod dump;
pub mod host;
pub mod image;
pub mod run;
pub mod run_common;
pub mod trace;

#[cfg(test)]
mod image_tests;
