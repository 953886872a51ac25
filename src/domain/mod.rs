//! Domain Layer
//!
//! The core of bundlelock: bundle identity, version ordering, scope rules
//! and the lockfile document.
//!
//! ## Structure
//!
//! - `entities/` - Lockfile, bundle listings, installed bundles
//! - `value_objects/` - Scope, SourceType, CommitMode, ContentHash, BundleIdentity
//! - `services/` - VersionConsolidator, ScopeConflictResolver, LruCache
//! - `ports/` - Interface definitions for infrastructure and host integrations
//!
//! ## Design Principles
//!
//! 1. **No direct I/O** - file access goes through the `FileSystem` port
//! 2. **Ports & Adapters** - hosts plug in installers, stores and validators

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
