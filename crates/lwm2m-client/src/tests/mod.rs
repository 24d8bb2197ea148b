//! Crate-level behaviour tests for `lwm2m_client`.

mod behaviour;
