//! Command implementations for the declutter binary.

pub mod declutter;
