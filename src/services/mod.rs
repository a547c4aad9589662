//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own loading, building and view-state bookkeeping so route
//! handlers can stay focused on protocol translation.

pub mod graph;
