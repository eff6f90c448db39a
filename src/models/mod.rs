// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for annotations and drawing geometry.

pub mod annotation;
pub mod draft;
pub mod image_set;
