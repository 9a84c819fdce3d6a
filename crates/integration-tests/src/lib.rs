//! End-to-end tests for chatrelay live under `tests/`
