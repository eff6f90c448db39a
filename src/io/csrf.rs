// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! CSRF token lookup in a browser-style cookie string.

use percent_encoding::percent_decode_str;

/// Cookie name the store issues its CSRF token under.
pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";

/// Find cookie `name` in a `k=v; k2=v2` string and percent-decode its value.
///
/// Returns `None` when the cookie is absent or the string is empty.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned())
}
