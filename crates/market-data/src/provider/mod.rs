//! Price source abstractions and implementations.
//!
//! This module contains:
//! - The `PriceSource` trait that every quote origin implements
//! - The seedable random source used as the default stand-in market
//!
//! Sources only answer "what is this symbol worth right now". Caching,
//! persistence and deadlines are the caller's concern.

mod traits;

pub mod random;

pub use traits::PriceSource;
