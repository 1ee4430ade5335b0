//! Collection of general utility functions and common traits.
//!
//! Holds the token signing and validation helpers shared by the
//! authentication service and the request middleware.

pub mod jwt;
