pub mod claim;
pub mod contact_record;
pub mod user_document;
pub mod user_login_info;
pub mod user_record;
pub mod version;
