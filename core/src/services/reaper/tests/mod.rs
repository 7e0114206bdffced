//! Unit tests for the expiry reaper

mod worker_tests;
