//! Success/failure envelope used by every port and handler.
//!
//! [`AdminResult`] is a plain [`Result`]: `Ok` is the success variant and
//! `Err` carries a catalog [`Error`]. [`Outcome`] adds the accessor vocabulary
//! callers use when they have already checked which variant they hold.

use super::error::Error;

/// Convenient result alias for ports, handlers and the dispatcher.
///
/// # Examples
/// ```
/// use identity_admin::domain::{AdminResult, UserErrors};
///
/// fn lookup(found: bool) -> AdminResult<u32> {
///     if found { Ok(7) } else { Err(UserErrors::NOT_FOUND.error()) }
/// }
///
/// assert!(lookup(true).is_ok());
/// assert_eq!(lookup(false).unwrap_err().code(), "User.NotFound");
/// ```
pub type AdminResult<T> = Result<T, Error>;

/// Accessors over an [`AdminResult`].
///
/// `response` and `error` are only valid on the matching variant; calling the
/// wrong one is a programming error and panics at the call site.
///
/// # Examples
/// ```
/// use identity_admin::domain::{AdminResult, Outcome};
///
/// let outcome: AdminResult<bool> = Ok(true);
/// assert!(outcome.is_success());
/// assert!(*outcome.response());
/// ```
pub trait Outcome<T> {
    /// Whether the success variant holds.
    fn is_success(&self) -> bool;

    /// Borrow the success payload.
    ///
    /// # Panics
    ///
    /// Panics when the failure variant holds.
    fn response(&self) -> &T;

    /// Borrow the failure payload.
    ///
    /// # Panics
    ///
    /// Panics when the success variant holds.
    fn error(&self) -> &Error;

    /// Take the success payload.
    ///
    /// # Panics
    ///
    /// Panics when the failure variant holds.
    fn into_response(self) -> T;

    /// Take the failure payload.
    ///
    /// # Panics
    ///
    /// Panics when the success variant holds.
    fn into_error(self) -> Error;
}

impl<T> Outcome<T> for AdminResult<T> {
    fn is_success(&self) -> bool {
        self.is_ok()
    }

    #[track_caller]
    fn response(&self) -> &T {
        match self {
            Ok(value) => value,
            Err(error) => panic!("response accessed on a failed outcome: {error}"),
        }
    }

    #[track_caller]
    fn error(&self) -> &Error {
        match self {
            Ok(_) => panic!("error accessed on a successful outcome"),
            Err(error) => error,
        }
    }

    #[track_caller]
    fn into_response(self) -> T {
        match self {
            Ok(value) => value,
            Err(error) => panic!("response accessed on a failed outcome: {error}"),
        }
    }

    #[track_caller]
    fn into_error(self) -> Error {
        match self {
            Ok(_) => panic!("error accessed on a successful outcome"),
            Err(error) => error,
        }
    }
}
