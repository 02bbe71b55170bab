//! Data shapes shared between the tracker API and its clients.
//!
//! Everything here is plain serde data: entities as they travel over the wire,
//! request payloads accepted by the API, report structures, and the common
//! response envelope.

pub mod model;
pub mod requests;
pub mod responses;
