//! Activity audit trail.
//!
//! User-visible actions (searches, download submissions, achievement
//! unlocks) and service lifecycle events are recorded through a cheap
//! cloneable handle into an async channel, written to storage by a
//! background task, and queried back for the activity feed.

mod events;
mod handle;
mod sqlite;
mod store;
mod writer;

pub use events::{AuditEvent, AuditRecord};
pub use handle::{AuditEventEnvelope, AuditHandle};
pub use sqlite::SqliteAuditStore;
pub use store::{AuditError, AuditFilter, AuditStore};
pub use writer::{create_audit_system, AuditWriter};
