mod guard;
mod navigator;
mod table;
mod views;
