//! Document codecs.

pub mod json;
