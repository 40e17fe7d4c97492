pub mod credentials;
pub mod user;
pub mod validation;
