pub mod auth_handler;

pub use auth_handler::{__path_get_me, __path_sign_out, get_me, sign_out};
