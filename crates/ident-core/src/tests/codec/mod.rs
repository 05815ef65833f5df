mod claims;
mod logins;
