mod api_client;
mod config_env;
mod error;
mod session_flow;
