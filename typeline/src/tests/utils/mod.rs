// Copyright 2026 the Typeline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod env;
mod renderer;

pub(crate) use env::{line_texts, FixedMeasurer, TestEnv, TEXT_SIZE};
pub(crate) use renderer::{DrawOp, PixmapCanvas, RecordingCanvas};
