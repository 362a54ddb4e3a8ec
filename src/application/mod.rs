//! Application layer - Use cases orchestrated over outbound ports

pub mod ports;
pub mod services;
