//! Error types crossing the port boundaries.
//!
//! None of these escape [`AccountManager`](crate::manager::AccountManager):
//! every operation folds them into a [`ResultCode`](crate::code::ResultCode)
//! before returning.

pub type Result<T> = std::result::Result<T, PortError>;

/// Failure reported by a port implementation.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("storage backend failed")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("notification delivery failed")]
    Delivery(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PortError {
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }

    pub fn delivery<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Delivery(Box::new(err))
    }
}

/// Shortcut for port implementations wrapping their backend errors.
pub trait ToPortError<T> {
    /// Wrap the error as a storage failure.
    fn store_err(self) -> Result<T>;

    /// Wrap the error as a delivery failure.
    fn delivery_err(self) -> Result<T>;
}

impl<T, E> ToPortError<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn store_err(self) -> Result<T> {
        self.map_err(PortError::store)
    }

    fn delivery_err(self) -> Result<T> {
        self.map_err(PortError::delivery)
    }
}
