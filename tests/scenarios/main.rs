//! Scenario-based tests for source build steps


mod architectures;
mod delegation;
mod dependency_links;
mod ref_resolution;
