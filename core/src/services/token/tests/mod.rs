//! Tests for the token service and key ring

mod service_tests;
