//! Domain layer for the SchoolERP identity service.
//!
//! Everything in this crate is I/O free: identifiers, entity kinds, photo
//! upload policy, public profile paths, QR rendering and the identity card
//! view model. Persistence lives in `schoolerp-db`, object storage in
//! `schoolerp-storage`.

pub mod card;
pub mod entity;
pub mod error;
pub mod identity;
pub mod media;
pub mod profile;
pub mod qr;
pub mod roles;
pub mod types;
pub mod validation;
