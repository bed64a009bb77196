mod jwks;
mod validator;

pub mod guards;
pub mod model;
pub mod session;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
