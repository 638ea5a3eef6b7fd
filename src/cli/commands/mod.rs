//! CLI command implementations

pub mod assignees;
pub mod begin;
pub mod board;
pub mod complete;
pub mod doctor;
pub mod init;
pub mod move_document;
pub mod transition;
