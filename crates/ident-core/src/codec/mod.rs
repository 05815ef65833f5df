pub mod claims;
pub mod logins;
