mod formatters;
mod router;
