//! Tests for the database module
