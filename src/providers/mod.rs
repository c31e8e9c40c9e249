mod google;
mod token;

pub use google::GoogleProvider;
pub use token::TokenSet;
