//! Unit tests for the S2S token provider

mod provider_tests;
