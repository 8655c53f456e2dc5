pub mod token;

pub use token::{RefreshedToken, TokenPair};
