mod pipeline;
mod providers;
mod service;
mod support;
mod token_estimator;
mod workspace;
