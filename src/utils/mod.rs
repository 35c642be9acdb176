// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod uniqueness;

pub use uniqueness::{first_duplicate, is_unique};
