pub mod account;
pub mod password;

pub use account::{AccountService, AuthError, NewUser};
pub use password::PasswordService;
