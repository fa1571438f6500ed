//! Authentication and tenant resolution

pub mod jwt;
pub mod middleware;
pub mod tenant;

pub use jwt::{CurrentUser, JwtService};
pub use tenant::{Permission, TenantContext};
