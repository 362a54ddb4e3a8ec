//! Ports - Interfaces between the application and the host environment

pub mod outbound;
