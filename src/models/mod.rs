pub mod user;

pub use user::{CreateUserBody, NewUser, UpdateUserBody, User, UserChanges};
