// Infrastructure layer - External dependencies and adapters
pub mod analytics_client;
pub mod config;
pub mod ndjson_stream;
pub mod response_mapper;
pub mod wire;
