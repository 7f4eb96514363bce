//! Shared test infrastructure.

mod db;
