//! nover - pre-flight Node.js version check library
//!
//! This library provides the pieces of the `nover` startup check:
//! - Target range resolution (command line argument, then package.json engines.node)
//! - npm-style range parsing and satisfaction
//! - Running Node.js version detection
//! - Package manager verification

pub mod check;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package_manager;
pub mod runtime;
