//! Repository 実装
//!
//! - `inmemory`: HashMap を使ったインメモリ実装（単一プロセス）

pub mod inmemory;

pub use inmemory::room::InMemoryRoomRepository;
