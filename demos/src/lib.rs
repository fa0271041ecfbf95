// Copyright 2026 the Viewshed Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runnable demos for the Viewshed crates; see the `examples/` directory.
