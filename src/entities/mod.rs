pub mod user_metadata;
pub mod users;

pub mod prelude {
    pub use super::users::Entity as Users;
}
