//! # System Interaction Layer
//!
//! Everything that touches the machine outside the parameter engine.
//!
//! ## Modules
//!
//! - **`executor`**: launches an external tool, drains its redirected output
//!   into a status sink and kills it on request from any thread.
//! - **`inspector`**: reads serials, versions and dates off a mounted disc for
//!   submission-info enrichment.

pub mod executor;
pub mod inspector;
