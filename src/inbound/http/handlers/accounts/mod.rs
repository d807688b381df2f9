mod login;
mod logout;

pub use login::{login, login_page};
pub use logout::logout;
