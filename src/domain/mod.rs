//! Domain value objects shared across conversion components.

pub mod attributes;
pub mod observation;
pub mod transcoding;
