//! Shared fixtures for domain unit tests.

use crate::domain::user::{
    EmailAddress, NewUserRecord, PasswordHashString, Role, User, UserId, UserStatus, Username,
};

/// Digest literal used where tests never verify the password.
pub(crate) const DUMMY_DIGEST: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";

/// Build an active user with the given handle, email, and role.
pub(crate) fn user_named(username: &str, email: &str, role: Role) -> User {
    User::new(
        UserId::random(),
        Username::new(username).expect("valid test username"),
        EmailAddress::new(email).expect("valid test email"),
        PasswordHashString::new(DUMMY_DIGEST.to_owned()),
        UserStatus::Active,
        role,
    )
}

/// Materialise the user a store insert would create from `record`.
pub(crate) fn user_from_record(record: NewUserRecord) -> User {
    let NewUserRecord {
        username,
        email,
        password_hash,
        status,
        role,
        bio,
        avatar,
        friends,
    } = record;
    User::new(UserId::random(), username, email, password_hash, status, role)
        .with_profile(bio, avatar)
        .with_friends(friends)
}
