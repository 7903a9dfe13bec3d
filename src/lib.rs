//! Inkpost - a small multi-user blog content service
//!
//! This library provides the core functionality for the inkpost content
//! service: a document-store-backed user/blog/comment model exposed over
//! REST and an envelope-style RPC surface.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod rpc;
pub mod services;
