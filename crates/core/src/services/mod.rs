//! Application services orchestrating ports

pub mod login;
pub mod projects;
pub mod requisition;
