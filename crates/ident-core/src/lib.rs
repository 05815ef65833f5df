pub mod codec;
pub mod error;
pub mod models;
pub mod normalizer;


pub use codec::claims::{ClaimSet, ClaimsEntry, EncodedClaims};
pub use codec::logins::{EncodedLogins, LOGIN_REMOVAL_MATCHES_PROVIDER_ONLY, LoginSet};
pub use error::{CoreError, Result};
pub use error_location::ErrorLocation;
pub use models::claim::Claim;
pub use models::contact_record::ContactRecord;
pub use models::user_document::{
    ContactDocument, DELETED_ON_SENTINEL, EMAIL_INDEX, USER_NAME_INDEX, UserDocument,
};
pub use models::user_login_info::UserLoginInfo;
pub use models::user_record::UserRecord;
pub use models::version::Version;
pub use normalizer::fold;
