//! Bibliotek — GraphQL catalog service for authors and books
//!
//! Layering, leaf to root: `db` (pool wrapper, repositories, cursor codec),
//! `services` (domain invariants and transactions), `graphql` (API surface),
//! `config` (environment).

pub mod config;
pub mod db;
pub mod graphql;
pub mod services;
