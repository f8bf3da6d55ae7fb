//! Tests for the OAuth module
