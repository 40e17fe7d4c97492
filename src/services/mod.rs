pub mod identity_service;
pub mod identity_service_impl;
pub mod token;
pub mod user_service;
pub mod user_service_impl;

pub use identity_service::{IdentityError, IdentityService, LoginSession};
pub use identity_service_impl::SeaOrmIdentityService;
pub use token::{Claims, IssuedToken, TokenIssuer, TokenOptions};
pub use user_service::{NewAccount, UserService};
pub use user_service_impl::SeaOrmUserService;
