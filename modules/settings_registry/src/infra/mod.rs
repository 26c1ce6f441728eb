//! Infrastructure layer - persistent store implementations

pub mod storage;
