pub mod fs;
pub mod net;

#[cfg(test)]
mod fs_test;
