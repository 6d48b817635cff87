//! Shared test harnesses
