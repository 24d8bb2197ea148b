//! Unit tests for `lwm2m_core` types.

mod request_tests;
