//! Permgraph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the permission graph
//! layout crates. It includes:
//!
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Categories**: The node category tag and its color lookup table ([`category::Category`])
//! - **Records**: Raw node and edge records as supplied by a data source ([`record`] module)

pub mod category;
pub mod color;
pub mod geometry;
pub mod record;
