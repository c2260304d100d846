//! Domain services used by the websocket route.
//!
//! ARCHITECTURE
//! ============
//! `session`, `live_stroke`, and `oplog` are the three pieces of shared
//! state. `dispatch` is the pure reaction table over them and `fanout`
//! applies it to the room and delivers the result. Route handlers stay
//! focused on transport.

pub mod chat;
pub mod dispatch;
pub mod fanout;
pub mod live_stroke;
pub mod oplog;
pub mod session;
