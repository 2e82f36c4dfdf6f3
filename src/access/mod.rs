//! Who may read and who may change what.
//!
//! Reads go through [`Visibility`], a declarative scope built once per request
//! that renders into a SQL predicate. Writes go through the checks in
//! [`policy`].

pub mod policy;
pub mod visibility;

pub use visibility::Visibility;
