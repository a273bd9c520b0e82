pub mod config;
pub mod logging;

pub mod fallback;
pub mod fetch;
pub mod layout;
pub mod ledger;
pub mod manifest;
pub mod pipeline;
pub mod resolver;
pub mod url_model;
