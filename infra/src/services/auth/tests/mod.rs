//! Tests for the in-memory authentication services
