// ABOUTME: Command implementations exposed by the CLI
// ABOUTME: Exports the interactive compare command and its non-interactive core

pub mod compare;

pub use compare::{compare, compare_with_prompter, run_comparison};
