pub mod exchange_sync;
