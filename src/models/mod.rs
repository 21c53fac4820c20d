// src/models/mod.rs

pub mod dn;
pub mod ou;
pub mod user;
pub mod group;
pub mod snapshot;

// Re-exports

pub use dn::{DistinguishedName, DnError, Rdn, RdnKind};
pub use ou::OuRecord;
pub use user::UserRecord;
pub use group::{GroupRecord, MemberList};
pub use snapshot::DirectorySnapshot;
