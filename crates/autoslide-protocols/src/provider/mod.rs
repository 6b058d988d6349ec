//! Vision provider protocol definitions.
//!
//! Providers connect to vision-capable model APIs (OpenAI, Gemini, etc.)
//! and answer a question about one or more images with short text.

mod request;
mod response;
mod traits;

pub use request::*;
pub use response::*;
pub use traits::*;
