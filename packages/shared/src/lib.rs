//! Helpers shared by the Odyssey Chat binaries and libraries.

pub mod logger;
pub mod time;
