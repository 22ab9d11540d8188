mod portal;
mod session;
mod user;

pub use portal::*;
pub use session::*;
pub use user::*;
