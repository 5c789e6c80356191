mod jwks;
mod session;
mod validator;

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;

pub use jwks::JwksClient;
pub use session::{JwtSessionResolver, SessionResolver};
pub use validator::JwtValidator;
