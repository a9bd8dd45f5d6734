//! Domain models

mod user;

pub use user::{NewUser, User, UserField};
