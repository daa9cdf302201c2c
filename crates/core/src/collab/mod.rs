//! Real-time co-editing of budget tables.
//!
//! Clients editing the same budget and type share a room. Each local change
//! is sent to the room as a small patch and peers apply it by row index.

pub mod channel;
pub mod debounce;
pub mod error;
pub mod events;
pub mod hub;
pub mod session;
pub mod subcategory;

pub use channel::{LocalChannel, RealtimeChannel, RoomSubscription};
pub use debounce::Debouncer;
pub use error::ChannelError;
pub use events::{
    ClientEvent, ItemChanged, ItemRemoved, RoomKey, ServerEvent, SubcategoryUpdate, TaxChanged,
};
pub use hub::{ConnectionId, RoomHub};
pub use session::CoEditSession;
pub use subcategory::SubcategoryCache;
