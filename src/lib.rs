// ABOUTME: Library module for pg-table-compare
// ABOUTME: Exports all core functionality for use in binary and tests

pub mod commands;
pub mod compare;
pub mod config;
pub mod error;
pub mod interactive;
pub mod postgres;
pub mod report;
