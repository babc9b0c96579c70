//! Python-facing wrappers.
mod python;

pub use python::register;
