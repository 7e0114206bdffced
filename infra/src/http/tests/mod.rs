//! Unit tests for the HTTP layer

mod caller_tests;
