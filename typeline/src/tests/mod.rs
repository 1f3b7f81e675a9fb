// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod test_line;
mod test_parser;
mod test_view;
pub(crate) mod utils;
