//! Bearer session tokens and the session view handed to actions.
//!
//! A token reads `{user_id}:{core}:{salt}`, core and salt base64url encoded without
//! padding. The store only ever sees the argon2 digest of the secret half.

use crate::{
    model::{
        Id,
        user::{User, UserMarker},
    },
    util::PositiveDuration,
};
use argon2::{Argon2, Params};
use base64::{DecodeError, Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use std::{
    fmt::{Debug, Display, Formatter},
    num::ParseIntError,
    str::FromStr,
};
use thiserror::Error;
use time::UtcDateTime;

pub const SECRET_CORE_LEN: usize = 24;
pub const SECRET_SALT_LEN: usize = 18;
pub const TOKEN_DIGEST_LEN: usize = Params::DEFAULT_OUTPUT_LEN;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum TokenPart {
    Core,
    Salt,
}

impl Display for TokenPart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenPart::Core => "core",
            TokenPart::Salt => "salt",
        })
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum SessionTokenDecodeError {
    #[error("Session token has no {0} part")]
    MissingPart(TokenPart),
    #[error("Session token user id is not a number: {0}")]
    UserId(ParseIntError),
    #[error("Session token {part} is not base64url: {source}")]
    Base64 { part: TokenPart, source: DecodeError },
    #[error("Session token {part} is {found} bytes long instead of {expected}")]
    Length {
        part: TokenPart,
        expected: usize,
        found: usize,
    },
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("Deriving the session token digest failed: {0}")]
pub struct SessionTokenHashError(argon2::Error);

/// The secret half of a session token.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct SessionSecret {
    core: [u8; SECRET_CORE_LEN],
    salt: [u8; SECRET_SALT_LEN],
}

impl SessionSecret {
    #[must_use]
    pub fn new(core: [u8; SECRET_CORE_LEN], salt: [u8; SECRET_SALT_LEN]) -> Self {
        Self { core, salt }
    }

    /// Argon2 digest under which the store indexes this secret.
    pub fn digest(&self) -> Result<SessionTokenHash, SessionTokenHashError> {
        let mut digest = [0; TOKEN_DIGEST_LEN];
        Argon2::default()
            .hash_password_into(&self.core, &self.salt, &mut digest)
            .map_err(SessionTokenHashError)?;

        Ok(SessionTokenHash(Box::new(digest)))
    }
}

impl Debug for SessionSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionSecret([redacted])")
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct SessionToken {
    pub user_id: Id<UserMarker>,
    pub secret: SessionSecret,
}

fn decode_part<const LEN: usize>(
    part: TokenPart,
    encoded: &str,
) -> Result<[u8; LEN], SessionTokenDecodeError> {
    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|source| SessionTokenDecodeError::Base64 { part, source })?;

    <[u8; LEN]>::try_from(bytes.as_slice()).map_err(|_| SessionTokenDecodeError::Length {
        part,
        expected: LEN,
        found: bytes.len(),
    })
}

impl FromStr for SessionToken {
    type Err = SessionTokenDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (user_id, secret) = s
            .split_once(':')
            .ok_or(SessionTokenDecodeError::MissingPart(TokenPart::Core))?;
        let (core, salt) = secret
            .split_once(':')
            .ok_or(SessionTokenDecodeError::MissingPart(TokenPart::Salt))?;

        Ok(Self {
            user_id: user_id.parse().map_err(SessionTokenDecodeError::UserId)?,
            secret: SessionSecret::new(
                decode_part(TokenPart::Core, core)?,
                decode_part(TokenPart::Salt, salt)?,
            ),
        })
    }
}

#[derive(Clone, Eq, PartialEq, Hash)]
pub struct SessionTokenHash(pub Box<[u8; TOKEN_DIGEST_LEN]>);

impl Debug for SessionTokenHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionTokenHash([redacted])")
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Stored session token digest is {0} bytes long instead of {TOKEN_DIGEST_LEN}")]
pub struct InvalidSessionTokenHashError(usize);

impl TryFrom<Vec<u8>> for SessionTokenHash {
    type Error = InvalidSessionTokenHashError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        <[u8; TOKEN_DIGEST_LEN]>::try_from(value.as_slice())
            .map(|digest| Self(Box::new(digest)))
            .map_err(|_| InvalidSessionTokenHashError(value.len()))
    }
}

/// A stored sign-in, looked up by the digest of the token that was handed out for it.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Authentication {
    pub user: Id<UserMarker>,
    pub token_hash: SessionTokenHash,
    pub created_at: UtcDateTime,
    pub expires_after: Option<PositiveDuration>,
}

impl Authentication {
    #[must_use]
    pub fn is_expired_at(&self, now: UtcDateTime) -> bool {
        self.expires_after
            .is_some_and(|lifetime| now > self.created_at + lifetime.get())
    }

    /// Whether `token` may act as this sign-in's user at `now`.
    #[must_use]
    pub fn admits(&self, token: &SessionToken, now: UtcDateTime) -> bool {
        token.user_id == self.user && !self.is_expired_at(now)
    }
}

/// Who is making a request, as far as the session layer can tell.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct Session {
    pub user: Option<SessionUser>,
}

/// Not every session source knows a stable id for its user.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct SessionUser {
    pub id: Option<Id<UserMarker>>,
}

impl Session {
    /// The stable id of the signed in user, if the session carries one.
    #[must_use]
    pub fn user_id(&self) -> Option<Id<UserMarker>> {
        self.user.as_ref()?.id
    }
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self { id: Some(user.id) }
    }
}
