// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O: the remote annotation store, image files and exports.

pub mod csrf;
pub mod http;
pub mod media;
pub mod remote;
pub mod requests;
pub mod serialization;
