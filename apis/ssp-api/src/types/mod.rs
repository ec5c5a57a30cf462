// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! SSP API type definitions

pub mod common;
pub mod features;
pub mod openshift;
pub mod otc;
pub mod sematext;
pub mod tower;

pub use common::*;
pub use features::*;
pub use openshift::*;
pub use otc::*;
pub use sematext::*;
pub use tower::*;
