// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Core components for signing package repository fetches.
//!
//! This crate provides the foundational types and traits shared by the storage
//! service crates. It knows nothing about a specific signing protocol; it only
//! defines the seams a protocol implementation plugs into.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for HTTP sending and sleeping
//! - **ConfigLookup**: The host's key/value configuration, read once into typed config values
//! - **Traits**: Abstract interfaces for credential loading (`ProvideCredential`) and request signing (`SignRequest`)
//!
//! ## Example
//!
//! ```
//! use cob_core::{ConfigLookup, Context, StaticConfig};
//!
//! let ctx = Context::new();
//! let cfg = StaticConfig::default().with("aws", "retries", "3");
//!
//! assert_eq!(cfg.get_int_or("aws", "retries", 5).unwrap(), 3);
//! assert_eq!(cfg.get_string("aws", "region"), None);
//! # let _ = ctx;
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting used by signing protocols
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{Context, HttpSend, NoopHttpSend, Sleep, ThreadSleep};

mod config;
pub use config::{ConfigLookup, StaticConfig};

mod api;
pub use api::{ProvideCredential, SignRequest};
