// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

#![warn(missing_docs, clippy::needless_borrow)]
// Clippy lints, some should be disabled incrementally
#![allow(clippy::new_without_default, clippy::upper_case_acronyms)]

//! Lambctl binds shell commands to the operations of the AWS Lambda API.
//!
//! Each command is described by a static [`schema::OperationSpec`]. Running
//! one goes through the same steps regardless of the operation: raw values
//! are bound to typed parameters ([`binder`]), copied into a REST request
//! ([`request`]), sent through a [`aws::LambdaService`], paged through when
//! the operation lists things ([`paginator`]) and projected into the output
//! the caller selected ([`output`]). [`command::Invocation`] ties the steps
//! together.

pub mod aws;
pub mod binder;
pub mod command;
pub mod config;
pub mod error;
pub mod output;
pub mod paginator;
pub mod prelude;
pub mod request;
pub mod schema;
pub mod test_util;
