//! UI components.

pub mod lens_graph;
