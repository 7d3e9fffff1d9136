/// Rewrite dependency references inside a single file
pub mod file_replace;
/// Recursive directory walking
pub mod file_utils;
