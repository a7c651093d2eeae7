// WebSocket front end for the draft simulator.

pub mod config;
pub mod protocol;
pub mod ws_server;
