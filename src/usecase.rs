pub mod clicks;
pub mod config;
pub mod links;
pub mod redirect;
pub mod stats;
#[cfg(test)]
pub(crate) mod testing;
pub mod usecase;
