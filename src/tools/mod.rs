//! Typed argument structs for the external tools.
//!
//! Each struct implements `ToolArgs` and maps one-to-one onto a single
//! command line. The sequencing of these commands lives in `certs` and
//! `permissions`.

pub mod openssl;
pub mod podman;
