// SPDX-License-Identifier: MIT
pub mod fetch;
pub mod verify;
