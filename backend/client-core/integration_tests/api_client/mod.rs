mod auth;
mod helpers;
mod interceptors;
