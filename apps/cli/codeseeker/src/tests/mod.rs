mod cli;
mod config;
mod error;
mod logger;
mod render;
