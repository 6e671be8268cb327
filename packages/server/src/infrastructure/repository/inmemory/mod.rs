//! InMemory repository implementations (process-lifetime state only).

pub mod room;
pub mod session;

pub use room::InMemoryRoomRepository;
pub use session::InMemorySessionRepository;
