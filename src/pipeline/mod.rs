// Pipeline orchestration.

pub mod evaluate;
