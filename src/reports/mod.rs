// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only report aggregators: pure functions of the ledger snapshot and
//! the compiled fact tables. Empty timeframes yield zero-filled structures,
//! never errors.

pub mod burn;
pub mod categories;
pub mod expenses;
pub mod flow;
pub mod savings;
