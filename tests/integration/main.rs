// tests/integration/main.rs

mod hierarchy;
mod web;
