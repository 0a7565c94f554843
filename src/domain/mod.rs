pub mod dto;
pub mod entity;
pub mod error;
pub mod ports;
pub mod topic;
