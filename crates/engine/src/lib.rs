// taskdeck-engine: the optimistic synchronization core.
//
// Local mutations apply immediately; the remote store catches up. The
// SyncEngine owns the in-memory task collection, the provisional-id ledger,
// and the project index, and drives every remote call through the
// `StoreClient` seam.

pub mod client;
pub mod config;
pub mod http;
pub mod ledger;
pub mod project;
pub mod store;
pub mod sync;
