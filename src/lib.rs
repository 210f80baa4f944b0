pub mod config;
pub mod controller;
pub mod history;
pub mod mapping;
pub mod output;
pub mod scheduler;
pub mod scope;
pub mod tone;
pub mod voices;
pub mod widget;
