//! Contains the stateful building blocks owned by individual views.
//!
//! A `Stopwatch` accumulates elapsed time across start/stop cycles, and an
//! `AzanWatcher` decides when a scheduled prayer alert should fire. Views keep
//! these across mode switches so they continue while another view is shown.

pub mod stopwatch;
pub mod watcher;
