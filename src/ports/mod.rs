//! These traits define what the manager needs from the outside world.

pub mod clock;
pub mod mailer;
pub mod session;
pub mod store;

pub use clock::*;
pub use mailer::*;
pub use session::*;
pub use store::*;
