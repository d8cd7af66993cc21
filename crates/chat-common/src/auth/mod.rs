//! Session token verification
//!
//! Sessions are issued by the authentication subsystem; this layer only
//! needs to resolve a bearer token to the calling user.

mod jwt;

pub use jwt::{Claims, JwtService};
