//! RGBA pixel buffer types for decoded XMG surfaces.
//!
//! This crate provides the packed [`Color`] type, the [`PixelBuffer`] and
//! [`MutablePixelBuffer`] access traits, and [`ManagedPixelBuffer`], the owned
//! surface a decode returns.

pub mod buffer;
pub mod color;
pub mod managed;

pub use buffer::{MutablePixelBuffer, PixelBuffer};
pub use color::Color;
pub use managed::ManagedPixelBuffer;
