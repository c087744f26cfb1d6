// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Fabric Client Authors

pub mod cert;
pub mod config;
