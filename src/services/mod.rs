// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod api;
pub mod events;
pub mod game;
pub mod scenarios;
pub mod session;
pub mod token;
pub mod tx;
