/// Template matching module for locating UI elements in screen captures
///
/// This module provides:
/// - Zero-mean normalized cross-correlation over all three color channels
/// - Best-placement selection over the full score map
/// - Exact integer window sums via summed-area tables, rows scored in parallel
/// - Coarse-to-fine search on block-averaged images for large templates
pub mod matcher;
pub mod types;

pub use matcher::TemplateMatcher;
pub use types::Match;
