mod crypto;
mod db;
mod extractor;
mod sessions;

pub use crypto::{hash_password, verify_password};
pub use db::{create_session, delete_session, SESSION_DAYS};
pub use extractor::{bearer_or_cookie_token, AuthUser, MaybeAuthUser, ACCESS_TOKEN_COOKIE};
pub use sessions::{PgSessionStore, SessionStore};

#[cfg(test)]
pub use sessions::InMemorySessionStore;
