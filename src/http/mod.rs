pub mod fetcher;

#[cfg(test)]
pub(crate) mod fake;
