// Saved-job registry: toggle membership and a joined read. Anonymous saves
// are never persisted here; the client replays them through the search `ids`
// filter instead.

pub mod handlers;
pub mod registry;
