//! User aggregate repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide whole-document read/insert/replace APIs over the `users` row.
//! - Keep SQL and JSON (de)serialization inside the persistence boundary.
//!
//! # Invariants
//! - Write paths must call input validation before SQL mutations.
//! - `replace_user` only succeeds when the caller still holds the version it
//!   read; a moved row surfaces as `VersionConflict`, never a silent
//!   overwrite.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::user::{NewUser, User, UserValidationError};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for user aggregate persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(UserValidationError),
    Db(DbError),
    /// No account is stored under the email.
    NotFound(String),
    /// An account already exists under the email.
    AlreadyExists(String),
    /// The stored aggregate changed since it was read.
    VersionConflict { email: String, expected: i64 },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(email) => write!(f, "user not found: {email}"),
            Self::AlreadyExists(email) => write!(f, "user already registered: {email}"),
            Self::VersionConflict { email, expected } => write!(
                f,
                "aggregate for {email} moved past version {expected} since it was read"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::AlreadyExists(_)
            | Self::VersionConflict { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One stored aggregate plus its optimistic concurrency token.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub user: User,
    pub version: i64,
}

/// Repository interface for user aggregate operations.
pub trait UserRepository {
    /// Creates the account row for a validated registration.
    fn insert_user(&self, new_user: &NewUser) -> RepoResult<()>;
    /// Loads one aggregate by email, matched case-insensitively.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>>;
    /// Replaces the whole aggregate, guarded by the version read earlier.
    /// Returns the new version on success.
    fn replace_user(&self, user: &User, expected_version: i64) -> RepoResult<i64>;
}

/// SQLite-backed user aggregate repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_user(&self, new_user: &NewUser) -> RepoResult<()> {
        new_user.validate()?;
        let email = new_user.email.to_lowercase();

        let inserted = self.conn.execute(
            "INSERT INTO users (email, first_name, last_name, password_hash, days)
             VALUES (?1, ?2, ?3, ?4, '[]');",
            params![
                email.as_str(),
                new_user.first_name.as_str(),
                new_user.last_name.as_str(),
                new_user.password_hash.as_str(),
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(err) if is_primary_key_violation(&err) => Err(RepoError::AlreadyExists(email)),
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        let email = email.to_lowercase();
        let mut stmt = self.conn.prepare(
            "SELECT email, first_name, last_name, password_hash, days, version
             FROM users
             WHERE email = ?1;",
        )?;

        let mut rows = stmt.query([email.as_str()])?;
        if let Some(row) = rows.next()? {
            let days_json: String = row.get("days")?;
            let days = serde_json::from_str(&days_json).map_err(|err| {
                RepoError::InvalidData(format!("unreadable days document for `{email}`: {err}"))
            })?;

            return Ok(Some(UserRecord {
                user: User {
                    email: row.get("email")?,
                    first_name: row.get("first_name")?,
                    last_name: row.get("last_name")?,
                    password_hash: row.get("password_hash")?,
                    days,
                },
                version: row.get("version")?,
            }));
        }

        Ok(None)
    }

    fn replace_user(&self, user: &User, expected_version: i64) -> RepoResult<i64> {
        let days_json = serde_json::to_string(&user.days).map_err(|err| {
            RepoError::InvalidData(format!(
                "unserializable days document for `{}`: {err}",
                user.email
            ))
        })?;

        let changed = self.conn.execute(
            "UPDATE users
             SET
                first_name = ?1,
                last_name = ?2,
                password_hash = ?3,
                days = ?4,
                version = version + 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE email = ?5
               AND version = ?6;",
            params![
                user.first_name.as_str(),
                user.last_name.as_str(),
                user.password_hash.as_str(),
                days_json.as_str(),
                user.email.as_str(),
                expected_version,
            ],
        )?;

        if changed == 0 {
            // Distinguish a vanished row from a concurrent writer.
            let exists: i64 = self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1);",
                [user.email.as_str()],
                |row| row.get(0),
            )?;
            if exists == 0 {
                return Err(RepoError::NotFound(user.email.clone()));
            }
            return Err(RepoError::VersionConflict {
                email: user.email.clone(),
                expected: expected_version,
            });
        }

        Ok(expected_version + 1)
    }
}

// Only the email primary key may report `AlreadyExists`; other constraint
// classes must keep surfacing as transport errors.
fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}
