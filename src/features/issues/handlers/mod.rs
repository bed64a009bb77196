mod issue_handler;

pub use issue_handler::*;
