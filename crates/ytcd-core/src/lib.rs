pub mod config;
pub mod logging;

pub mod control;
pub mod cookies;
pub mod enumerator;
pub mod fetch;
pub mod ledger;
pub mod listing;
pub mod orchestrator;
pub mod planner;
pub mod retry;
pub mod ytdlp;
