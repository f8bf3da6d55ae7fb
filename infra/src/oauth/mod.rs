//! OAuth module - authorization-code flow against Google and GitHub

pub mod client;

#[cfg(test)]
mod tests;

pub use client::HttpOAuthClient;
