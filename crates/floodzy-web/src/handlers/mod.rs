//! HTTP Request Handlers

pub mod chatbot;
