mod config;
mod prompts;
mod registry;
mod response_parser;
mod token_estimator;
