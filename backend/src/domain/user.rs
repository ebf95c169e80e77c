//! User account data model.
//!
//! Purpose: strongly typed account primitives with their invariants enforced
//! at construction, so services and adapters never see a malformed username,
//! email address, or identifier. Serialisation contracts are documented on
//! each type; the outward representation never includes the password hash.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Validation errors returned by the fallible constructors in this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier was empty.
    EmptyId,
    /// The identifier is not a UUID in canonical textual form.
    InvalidId,
    /// The username was blank once trimmed.
    EmptyUsername,
    /// The username is shorter than the minimum length.
    UsernameTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// The username is longer than the maximum length.
    UsernameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The username contains characters outside the accepted set.
    UsernameInvalidCharacters,
    /// The email address is not syntactically valid.
    InvalidEmail,
    /// The password was empty.
    EmptyPassword,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, dots, dashes, or underscores",
            ),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// The store mints identifiers at insertion time; everything else treats them
/// as opaque. Keeping the original string alongside the parsed UUID avoids
/// re-rendering on every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Errors
    /// Returns [`UserValidationError::EmptyId`] or
    /// [`UserValidationError::InvalidId`] when the input is not a canonical
    /// UUID string.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[A-Za-z0-9_.-]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Unique handle a user registers under. Case-sensitive as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`] from owned input.
    ///
    /// # Errors
    /// Returns a [`UserValidationError`] describing the first failed check.
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(username.into())
    }

    fn from_owned(username: String) -> Result<Self, UserValidationError> {
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }

        let length = username.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }

        if !username_regex().is_match(&username) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }

        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Syntactic check only: local part, one @, dotted domain.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Syntactically valid email address. Unique across users, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`] from owned input.
    ///
    /// # Errors
    /// Returns [`UserValidationError::InvalidEmail`] when the input does not
    /// look like `local@domain.tld`.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        if email.trim() != email || !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Coarse-grained permission tag attached to a user and copied into issued
/// tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular account. The only role self-registration can produce.
    User,
    /// Administrative account, created solely by the bootstrap seeding step.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

/// Account lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Account in good standing. Every registration starts here.
    #[default]
    Active,
    /// Account disabled by an operator. Outstanding tokens still verify
    /// until they expire; statelessness is a documented tradeoff.
    Disabled,
}

/// Opaque PHC-format password digest.
///
/// Never serialised outward; only the persistence adapter and the credential
/// hasher look inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    /// Wrap an already-computed digest.
    #[must_use]
    pub const fn new(digest: String) -> Self {
        Self(digest)
    }

    /// The PHC string as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PasswordHashString> for String {
    fn from(value: PasswordHashString) -> Self {
        value.0
    }
}

/// Application user account.
///
/// ## Invariants
/// - `friends` never contains `id` and never contains duplicates; the store
///   adapter's atomic set primitives preserve this.
/// - A friend entry referred to an existing user at insertion time. Deleting
///   a user does not cascade-clean other users' friend lists (known gap).
///
/// Serialises through [`UserDto`], which omits the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "UserDto")]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    password_hash: PasswordHashString,
    status: UserStatus,
    role: Role,
    bio: Option<String>,
    avatar: Option<String>,
    friends: Vec<UserId>,
}

impl User {
    /// Build a [`User`] from validated components.
    #[must_use]
    pub fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        password_hash: PasswordHashString,
        status: UserStatus,
        role: Role,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            status,
            role,
            bio: None,
            avatar: None,
            friends: Vec::new(),
        }
    }

    /// Attach display metadata.
    #[must_use]
    pub fn with_profile(mut self, bio: Option<String>, avatar: Option<String>) -> Self {
        self.bio = bio;
        self.avatar = avatar;
        self
    }

    /// Replace the friend set. Callers are responsible for the set already
    /// satisfying the no-self/no-duplicate invariants.
    #[must_use]
    pub fn with_friends(mut self, friends: Vec<UserId>) -> Self {
        self.friends = friends;
        self
    }

    /// Stable user identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique handle.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Unique email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored password digest.
    #[must_use]
    pub fn password_hash(&self) -> &PasswordHashString {
        &self.password_hash
    }

    /// Lifecycle state.
    #[must_use]
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Permission tag.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Optional biography text.
    #[must_use]
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// Optional avatar reference.
    #[must_use]
    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    /// One-directional friend edges, duplicate-free.
    #[must_use]
    pub fn friends(&self) -> &[UserId] {
        &self.friends
    }

    /// Whether a friend edge to `other` exists.
    #[must_use]
    pub fn has_friend(&self, other: &UserId) -> bool {
        self.friends.iter().any(|friend| friend == other)
    }
}

/// Outward representation of a [`User`]; excludes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Stable identifier.
    pub id: String,
    /// Unique handle.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Lifecycle state.
    pub status: UserStatus,
    /// Permission tag.
    pub role: Role,
    /// Optional biography text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Optional avatar reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Identifiers of befriended users.
    pub friends: Vec<String>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            username,
            email,
            password_hash: _,
            status,
            role,
            bio,
            avatar,
            friends,
        } = value;
        Self {
            id: id.to_string(),
            username: username.into(),
            email: email.into(),
            status,
            role,
            bio,
            avatar,
            friends: friends.into_iter().map(String::from).collect(),
        }
    }
}

/// Validated registration input.
///
/// The plaintext password lives in a [`Zeroizing`] buffer and is dropped as
/// soon as the identity service has derived the digest.
#[derive(Debug, Clone)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
    bio: Option<String>,
    avatar: Option<String>,
}

impl Registration {
    /// Construct a registration from raw boundary input.
    ///
    /// # Errors
    /// Returns the first failed field validation.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
        bio: Option<String>,
        avatar: Option<String>,
    ) -> Result<Self, UserValidationError> {
        let username = Username::new(username)?;
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }

        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
            bio,
            avatar,
        })
    }

    /// Requested handle.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Optional biography text.
    #[must_use]
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// Optional avatar reference.
    #[must_use]
    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    /// Split into the optional profile fields, consuming the registration.
    #[must_use]
    pub fn into_profile(self) -> (Option<String>, Option<String>) {
        (self.bio, self.avatar)
    }
}

/// Record handed to the store for insertion; the store mints the id.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    /// Unique handle.
    pub username: Username,
    /// Unique email address.
    pub email: EmailAddress,
    /// Derived password digest.
    pub password_hash: PasswordHashString,
    /// Lifecycle state at creation.
    pub status: UserStatus,
    /// Permission tag at creation.
    pub role: Role,
    /// Optional biography text.
    pub bio: Option<String>,
    /// Optional avatar reference.
    pub avatar: Option<String>,
    /// Initial friend set; empty for registrations.
    pub friends: Vec<UserId>,
}

/// Partial-merge update payload: only populated fields change.
///
/// Role and password changes are deliberately not update operations; the
/// former is never client-settable and the latter would need its own hashing
/// path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement handle.
    pub username: Option<Username>,
    /// Replacement email address.
    pub email: Option<EmailAddress>,
    /// Replacement biography text.
    pub bio: Option<String>,
    /// Replacement avatar reference.
    pub avatar: Option<String>,
    /// Replacement lifecycle state.
    pub status: Option<UserStatus>,
}

impl UserPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.avatar.is_none()
            && self.status.is_none()
    }
}
