// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for capture device discovery
//!
//! The backend layer abstracts host discovery, providing a consistent API
//! regardless of the underlying mechanism:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Caller (CLI / App)              │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Discovery Layer                 │
//! │  ┌─────────────┐  ┌────────┐  ┌─────────┐   │
//! │  │  PipeWire   │  │  V4L2  │  │  Fixed  │   │
//! │  │ (cam + mic) │  │ (cam)  │  │(snapshot)│  │
//! │  └─────────────┘  └────────┘  └─────────┘   │
//! └─────────────────────────────────────────────┘
//! ```

pub mod discovery;
