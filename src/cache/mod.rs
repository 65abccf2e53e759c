pub mod clock;
pub(crate) mod timed_cache;
