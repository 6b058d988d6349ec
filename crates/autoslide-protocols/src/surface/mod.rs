//! Surface protocol definitions.
//!
//! A surface is the interactive page region a puzzle is rendered in. The
//! solver only ever talks to it through element selectors, pixel offsets and
//! screenshots, so any page-automation backend can provide one.

mod traits;
mod types;

pub use traits::*;
pub use types::*;
