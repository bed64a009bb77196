pub mod auth;
pub mod intake;
pub mod issues;
pub mod media;
