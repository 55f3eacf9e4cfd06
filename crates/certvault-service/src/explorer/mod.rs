//! Explorer sessions: the stateful listing layer.
//!
//! A session tracks the current folder, page, and search term for one
//! console view, re-fetches when any of them change, and guards against
//! out-of-order responses so a slow earlier fetch can never overwrite a
//! newer one.

pub mod breadcrumbs;
pub mod debounce;
pub mod race;
pub mod registry;
pub mod session;

pub use breadcrumbs::BreadcrumbResolver;
pub use debounce::SearchDebouncer;
pub use race::{Ticket, TicketCounter};
pub use registry::ExplorerRegistry;
pub use session::{ExplorerSession, ExplorerView, SearchInput};
