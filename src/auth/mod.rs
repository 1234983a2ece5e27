//! Rolling token authentication.
//!
//! Both parties derive the same short-lived token from a shared secret and the
//! current time bucket (`unix_seconds / interval`), so tokens never need to be
//! exchanged or stored:
//!
//! - [`TokenGenerator`] derives tokens and holds no mutable state.
//! - [`RollingValidator`] accepts tokens from a window of adjacent buckets,
//!   caching the window's tokens between calls.
//! - [`SharedValidator`] puts a validator behind a mutex for shared use.

mod clock;
mod encoding;
mod hmac;
mod rolling;
mod secret;
mod shared;
mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use hmac::TokenGenerator;
pub use rolling::{RollingValidator, DEFAULT_TOLERANCE, MAX_TOLERANCE};
pub use secret::Secret;
pub use shared::SharedValidator;
pub use token::{parse_bearer, Token, BEARER_PREFIX};
