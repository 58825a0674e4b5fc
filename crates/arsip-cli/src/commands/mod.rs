//! Command handlers

pub mod arsip;
pub mod config;
