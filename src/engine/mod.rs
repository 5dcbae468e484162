//! Engine modules: translate settings into an ordered install plan.
//!
//! The engine sits between configuration (what the user wants) and execution
//! (files written, tools invoked). It only generates plans; it never touches disk.

pub mod plan;
